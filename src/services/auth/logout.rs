use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::FoodgramError;
use crate::middlewares::RequireJWT;
use crate::middlewares::require_jwt::user_cache_key;

use super::AuthService;

/// 注销：递增 token_version 让已签发的令牌全部失效，并清掉该用户的缓存
pub async fn handle_logout(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request)
        .ok_or_else(|| FoodgramError::authentication("Authentication credentials were not provided"))?;
    let storage = service.get_storage(request)?;

    storage.bump_token_version(user_id).await?;

    if let Some(cache) = crate::services::cache_from_request(request) {
        cache.remove(&user_cache_key(user_id)).await;
    }

    info!("User {} logged out", user_id);
    Ok(HttpResponse::NoContent().finish())
}
