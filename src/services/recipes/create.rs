use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{RecipeService, bad_request, present_recipe};
use crate::config::AppConfig;
use crate::errors::{FoodgramError, Result};
use crate::middlewares::RequireJWT;
use crate::models::ErrorCode;
use crate::models::recipes::entities::{IngredientAmount, NewRecipe};
use crate::models::recipes::requests::CreateRecipeRequest;
use crate::storage::Storage;
use crate::utils::image::decode_data_url;
use crate::utils::media::{self, MediaKind};
use crate::utils::validate::{
    validate_cooking_time, validate_recipe_ingredients, validate_recipe_name,
};

/// 所有食材 id 都存在
pub(crate) async fn ingredients_exist(
    storage: &dyn Storage,
    ingredients: &[IngredientAmount],
) -> Result<bool> {
    let ids: Vec<i64> = ingredients.iter().map(|item| item.ingredient_id).collect();
    let found = storage.count_existing_ingredients(&ids).await?;
    Ok(found == ids.len() as u64)
}

pub async fn create_recipe(
    service: &RecipeService,
    recipe_data: CreateRecipeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let author_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;

    // 字段校验
    let ingredients = match validate_recipe_ingredients(&recipe_data.ingredients) {
        Ok(ingredients) => ingredients,
        Err(msg) => return Ok(bad_request(ErrorCode::RecipeInvalid, msg)),
    };
    let Some(image_data) = recipe_data
        .image
        .as_deref()
        .map(str::trim)
        .filter(|data| !data.is_empty())
    else {
        return Ok(bad_request(ErrorCode::ImageInvalid, "Image is required"));
    };
    if let Err(msg) = validate_recipe_name(&recipe_data.name) {
        return Ok(bad_request(ErrorCode::RecipeInvalid, msg));
    }
    if recipe_data.text.trim().is_empty() {
        return Ok(bad_request(ErrorCode::RecipeInvalid, "Recipe text is required"));
    }
    let cooking_time = match validate_cooking_time(recipe_data.cooking_time) {
        Ok(cooking_time) => cooking_time,
        Err(msg) => return Ok(bad_request(ErrorCode::RecipeInvalid, msg)),
    };

    let storage = service.get_storage(request)?;
    if !ingredients_exist(storage.as_ref(), &ingredients).await? {
        return Ok(bad_request(
            ErrorCode::IngredientNotFound,
            "One or more ingredients do not exist",
        ));
    }

    let image = decode_data_url(image_data, AppConfig::get().media.max_image_size)?;
    let image_path = media::save_image(MediaKind::Recipe, &image)?;

    let new_recipe = NewRecipe {
        author_id,
        name: recipe_data.name.trim().to_string(),
        image: image_path.clone(),
        text: recipe_data.text,
        cooking_time,
        ingredients,
    };

    let recipe = match storage.create_recipe(new_recipe).await {
        Ok(recipe) => recipe,
        Err(e) => {
            media::remove_file(&image_path);
            return Err(e.into());
        }
    };

    info!("User {} created recipe {}", author_id, recipe.id);
    let response = present_recipe(storage.as_ref(), request, recipe).await?;
    Ok(HttpResponse::Created().json(response))
}
