use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::create::ingredients_exist;
use super::{RecipeService, bad_request, present_recipe, recipe_not_found};
use crate::config::AppConfig;
use crate::errors::FoodgramError;
use crate::middlewares::RequireJWT;
use crate::models::recipes::entities::RecipeChanges;
use crate::models::recipes::requests::UpdateRecipeRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::image::decode_data_url;
use crate::utils::media::{self, MediaKind};
use crate::utils::validate::{
    validate_cooking_time, validate_recipe_ingredients, validate_recipe_name,
};

pub async fn update_recipe(
    service: &RecipeService,
    recipe_id: i64,
    update_data: UpdateRecipeRequest,
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
            "Only the author can modify this recipe",
        )));
    }

    // 食材列表每次都要重新提交
    let Some(raw_ingredients) = update_data.ingredients.as_deref() else {
        return Ok(bad_request(
            ErrorCode::RecipeInvalid,
            "Ingredients are required",
        ));
    };
    let ingredients = match validate_recipe_ingredients(raw_ingredients) {
        Ok(ingredients) => ingredients,
        Err(msg) => return Ok(bad_request(ErrorCode::RecipeInvalid, msg)),
    };

    let mut changes = RecipeChanges::default();
    if let Some(name) = update_data.name {
        if let Err(msg) = validate_recipe_name(&name) {
            return Ok(bad_request(ErrorCode::RecipeInvalid, msg));
        }
        changes.name = Some(name.trim().to_string());
    }
    if let Some(text) = update_data.text {
        if text.trim().is_empty() {
            return Ok(bad_request(ErrorCode::RecipeInvalid, "Recipe text is required"));
        }
        changes.text = Some(text);
    }
    if let Some(cooking_time) = update_data.cooking_time {
        match validate_cooking_time(cooking_time) {
            Ok(cooking_time) => changes.cooking_time = Some(cooking_time),
            Err(msg) => return Ok(bad_request(ErrorCode::RecipeInvalid, msg)),
        }
    }

    if !ingredients_exist(storage.as_ref(), &ingredients).await? {
        return Ok(bad_request(
            ErrorCode::IngredientNotFound,
            "One or more ingredients do not exist",
        ));
    }
    changes.ingredients = Some(ingredients);

    // 新图片先落盘，提交成功后再删除旧图片
    let new_image = match update_data.image.as_deref().map(str::trim) {
        Some("") => return Ok(bad_request(ErrorCode::ImageInvalid, "Image is required")),
        Some(data) => {
            let image = decode_data_url(data, AppConfig::get().media.max_image_size)?;
            Some(media::save_image(MediaKind::Recipe, &image)?)
        }
        None => None,
    };
    changes.image = new_image.clone();

    let updated = match storage.update_recipe(recipe.id, changes).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            if let Some(path) = &new_image {
                media::remove_file(path);
            }
            return Ok(recipe_not_found());
        }
        Err(e) => {
            if let Some(path) = &new_image {
                media::remove_file(path);
            }
            return Err(e.into());
        }
    };

    if new_image.is_some() {
        media::remove_file(&recipe.image);
    }

    info!("User {} updated recipe {}", user_id, recipe.id);
    let response = present_recipe(storage.as_ref(), request, updated).await?;
    Ok(HttpResponse::Ok().json(response))
}
