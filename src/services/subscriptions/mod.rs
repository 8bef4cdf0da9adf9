pub mod list;
pub mod subscribe;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::subscriptions::requests::{SubscribeParams, SubscriptionListParams};
use crate::models::subscriptions::responses::UserWithRecipesResponse;
use crate::models::users::responses::UserResponse;
use crate::services::recipes::present_short_recipe;
use crate::storage::Storage;

pub struct SubscriptionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubscriptionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 当前用户的订阅列表
    pub async fn list_subscriptions(
        &self,
        query: SubscriptionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_subscriptions(self, query, request).await
    }

    // 订阅作者
    pub async fn subscribe(
        &self,
        author_id: i64,
        query: SubscribeParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        subscribe::subscribe(self, author_id, query, request).await
    }

    // 取消订阅
    pub async fn unsubscribe(
        &self,
        author_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        subscribe::unsubscribe(self, author_id, request).await
    }
}

/// 作者表示附带最新菜谱和菜谱总数
pub(crate) async fn with_recipes(
    storage: &dyn Storage,
    request: &HttpRequest,
    user: UserResponse,
    recipes_limit: Option<u64>,
) -> Result<UserWithRecipesResponse> {
    let recipes = storage.list_recipes_by_author(user.id, recipes_limit).await?;
    let recipes_count = storage.count_recipes_by_author(user.id).await?;

    Ok(UserWithRecipesResponse {
        user,
        recipes: recipes
            .iter()
            .map(|recipe| present_short_recipe(request, recipe))
            .collect(),
        recipes_count,
    })
}
