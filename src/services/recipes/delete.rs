use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{RecipeService, recipe_not_found};
use crate::errors::FoodgramError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::media;

pub async fn delete_recipe(
    service: &RecipeService,
    recipe_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;
    let storage = service.get_storage(request)?;

    let Some(recipe) = storage.get_recipe_by_id(recipe_id).await? else {
        return Ok(recipe_not_found());
    };
    if recipe.author_id != user_id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error(
            ErrorCode::Forbidden,
            "Only the author can delete this recipe",
        )));
    }

    if !storage.delete_recipe(recipe.id).await? {
        return Ok(recipe_not_found());
    }
    media::remove_file(&recipe.image);

    info!("User {} deleted recipe {}", user_id, recipe.id);
    Ok(HttpResponse::NoContent().finish())
}
