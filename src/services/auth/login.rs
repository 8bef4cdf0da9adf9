use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::errors::FoodgramError;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, TokenResponse},
};
use crate::utils::password::verify_password;

use super::AuthService;

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 1. 根据邮箱获取用户
    let user = match storage.get_user_by_email(login_request.email.trim()).await? {
        Some(user) if user.is_active => user,
        _ => {
            info!("Login rejected for unknown or inactive email");
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
                ErrorCode::AuthFailed,
                INVALID_CREDENTIALS,
            )));
        }
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Login rejected for user {}: wrong password", user.id);
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::AuthFailed,
            INVALID_CREDENTIALS,
        )));
    }

    // 3. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 4. 签发令牌
    let auth_token = user.generate_access_token().map_err(|e| {
        tracing::error!("Failed to generate token: {}", e);
        FoodgramError::internal("Login failed, unable to generate token")
    })?;

    info!("User {} logged in", user.username);
    Ok(HttpResponse::Ok().json(TokenResponse { auth_token }))
}
