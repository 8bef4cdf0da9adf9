use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::FoodgramError;
use crate::middlewares::RequireJWT;
use crate::models::users::requests::SetPasswordRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password;

pub async fn set_password(
    service: &UserService,
    password_data: SetPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;
    let storage = service.get_storage(request)?;

    // 缓存里的用户不带密码哈希
    let user = storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| FoodgramError::authentication("User not found"))?;

    if !verify_password(&password_data.current_password, &user.password_hash) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::UserPasswordInvalid,
            "Current password is incorrect",
        )));
    }

    let check = validate_password(&password_data.new_password, &user.username, &user.email);
    if !check.is_valid {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::UserPasswordInvalid,
            check.error_message(),
        )));
    }

    let password_hash = hash_password(&password_data.new_password)?;
    storage.update_password(user.id, &password_hash).await?;

    info!("User {} changed password", user.id);
    Ok(HttpResponse::NoContent().finish())
}
