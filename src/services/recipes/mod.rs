pub mod collections;
pub mod create;
pub mod delete;
pub mod get;
pub mod link;
pub mod list;
pub mod shopping_list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::errors::{FoodgramError, Result};
use crate::middlewares::RequireJWT;
use crate::models::recipes::entities::Recipe;
use crate::models::recipes::requests::{CreateRecipeRequest, RecipeListParams, UpdateRecipeRequest};
use crate::models::recipes::responses::{RecipeResponse, ShortRecipeResponse};
use crate::services::users::present_users;
use crate::storage::Storage;
use crate::utils::media::media_url;

pub use collections::RecipeCollection;

pub struct RecipeService {
    storage: Option<Arc<dyn Storage>>,
}

impl RecipeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 菜谱列表
    pub async fn list_recipes(
        &self,
        query: RecipeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_recipes(self, query, request).await
    }

    pub async fn get_recipe(
        &self,
        recipe_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_recipe(self, recipe_id, request).await
    }

    pub async fn create_recipe(
        &self,
        recipe_data: CreateRecipeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_recipe(self, recipe_data, request).await
    }

    pub async fn update_recipe(
        &self,
        recipe_id: i64,
        update_data: UpdateRecipeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_recipe(self, recipe_id, update_data, request).await
    }

    pub async fn delete_recipe(
        &self,
        recipe_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_recipe(self, recipe_id, request).await
    }

    // 加入收藏或购物车
    pub async fn add_to_collection(
        &self,
        collection: RecipeCollection,
        recipe_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        collections::add(self, collection, recipe_id, request).await
    }

    // 移出收藏或购物车
    pub async fn remove_from_collection(
        &self,
        collection: RecipeCollection,
        recipe_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        collections::remove(self, collection, recipe_id, request).await
    }

    // 下载购物清单
    pub async fn download_shopping_cart(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        shopping_list::download_shopping_cart(self, request).await
    }

    // 短链接
    pub async fn get_link(&self, recipe_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        link::get_link(self, recipe_id, request).await
    }
}

pub(crate) fn present_short_recipe(request: &HttpRequest, recipe: &Recipe) -> ShortRecipeResponse {
    ShortRecipeResponse {
        id: recipe.id,
        name: recipe.name.clone(),
        image: media_url(request, &recipe.image),
        cooking_time: recipe.cooking_time,
    }
}

/// 批量生成菜谱完整表示，收藏和购物车标记相对当前请求者
pub(crate) async fn present_recipes(
    storage: &dyn Storage,
    request: &HttpRequest,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeResponse>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i64> = recipes.iter().map(|recipe| recipe.id).collect();
    let mut author_ids: Vec<i64> = recipes.iter().map(|recipe| recipe.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors = storage.get_users_by_ids(&author_ids).await?;
    let authors: HashMap<i64, _> = present_users(storage, request, &authors)
        .await?
        .into_iter()
        .map(|author| (author.id, author))
        .collect();

    let (favorited, in_cart) = match RequireJWT::extract_user_id(request) {
        Some(viewer_id) => (
            storage.favorited_recipe_ids(viewer_id, &recipe_ids).await?,
            storage.shopping_cart_recipe_ids(viewer_id, &recipe_ids).await?,
        ),
        None => (HashSet::new(), HashSet::new()),
    };
    let mut ingredients = storage.list_recipe_ingredients(&recipe_ids).await?;

    let mut responses = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let author = match authors.get(&recipe.author_id) {
            Some(author) => author.clone(),
            None => {
                return Err(FoodgramError::internal(format!(
                    "Author {} of recipe {} is missing",
                    recipe.author_id, recipe.id
                )));
            }
        };
        responses.push(RecipeResponse {
            id: recipe.id,
            author,
            ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
            is_favorited: favorited.contains(&recipe.id),
            is_in_shopping_cart: in_cart.contains(&recipe.id),
            image: media_url(request, &recipe.image),
            name: recipe.name,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        });
    }

    Ok(responses)
}

/// 单个菜谱的完整表示
pub(crate) async fn present_recipe(
    storage: &dyn Storage,
    request: &HttpRequest,
    recipe: Recipe,
) -> Result<RecipeResponse> {
    present_recipes(storage, request, vec![recipe])
        .await?
        .pop()
        .ok_or_else(|| FoodgramError::internal("Failed to render recipe"))
}

pub(crate) fn bad_request(
    code: crate::models::ErrorCode,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::BadRequest().json(crate::models::ApiResponse::error(code, message))
}

pub(crate) fn recipe_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(crate::models::ApiResponse::error(
        crate::models::ErrorCode::RecipeNotFound,
        "Recipe not found",
    ))
}
