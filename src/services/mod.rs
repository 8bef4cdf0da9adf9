pub mod auth;
pub mod ingredients;
pub mod media;
pub mod recipes;
pub mod short_links;
pub mod subscriptions;
pub mod users;

use actix_web::{HttpRequest, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::{FoodgramError, Result};
use crate::storage::Storage;

pub use auth::AuthService;
pub use ingredients::IngredientService;
pub use media::MediaService;
pub use recipes::RecipeService;
pub use short_links::ShortLinkService;
pub use subscriptions::SubscriptionService;
pub use users::UserService;

/// 从 app_data 中取存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| FoodgramError::internal("Storage not found in app data"))
}

/// 从 app_data 中取缓存实例，未配置时返回 None
pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}
