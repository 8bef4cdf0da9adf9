use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{RecipeService, bad_request, present_short_recipe, recipe_not_found};
use crate::errors::FoodgramError;
use crate::middlewares::RequireJWT;
use crate::models::ErrorCode;

/// 用户的菜谱集合：收藏夹或购物车
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCollection {
    Favorites,
    ShoppingCart,
}

impl RecipeCollection {
    fn name(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "favorites",
            RecipeCollection::ShoppingCart => "shopping cart",
        }
    }

    fn exists_code(self) -> ErrorCode {
        match self {
            RecipeCollection::Favorites => ErrorCode::FavoriteExists,
            RecipeCollection::ShoppingCart => ErrorCode::ShoppingCartExists,
        }
    }

    fn missing_code(self) -> ErrorCode {
        match self {
            RecipeCollection::Favorites => ErrorCode::FavoriteNotFound,
            RecipeCollection::ShoppingCart => ErrorCode::ShoppingCartNotFound,
        }
    }
}

pub async fn add(
    service: &RecipeService,
    collection: RecipeCollection,
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

    let result = match collection {
        RecipeCollection::Favorites => storage.add_favorite(user_id, recipe.id).await,
        RecipeCollection::ShoppingCart => storage.add_to_shopping_cart(user_id, recipe.id).await,
    };
    match result {
        Ok(()) => {}
        Err(FoodgramError::Conflict(_)) => {
            return Ok(bad_request(
                collection.exists_code(),
                format!("Recipe is already in {}", collection.name()),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    info!("User {} added recipe {} to {}", user_id, recipe.id, collection.name());
    Ok(HttpResponse::Created().json(present_short_recipe(request, &recipe)))
}

pub async fn remove(
    service: &RecipeService,
    collection: RecipeCollection,
    recipe_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;
    let storage = service.get_storage(request)?;

    if storage.get_recipe_by_id(recipe_id).await?.is_none() {
        return Ok(recipe_not_found());
    }

    let removed = match collection {
        RecipeCollection::Favorites => storage.remove_favorite(user_id, recipe_id).await?,
        RecipeCollection::ShoppingCart => {
            storage.remove_from_shopping_cart(user_id, recipe_id).await?
        }
    };
    if !removed {
        return Ok(bad_request(
            collection.missing_code(),
            format!("Recipe is not in {}", collection.name()),
        ));
    }

    info!(
        "User {} removed recipe {} from {}",
        user_id,
        recipe_id,
        collection.name()
    );
    Ok(HttpResponse::NoContent().finish())
}
