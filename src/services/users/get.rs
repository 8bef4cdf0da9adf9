use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, present_user};
use crate::errors::FoodgramError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(user_id).await? {
        Some(user) => {
            let response = present_user(storage.as_ref(), request, &user).await?;
            Ok(HttpResponse::Ok().json(response))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
    }
}

/// 当前用户，从存储重新加载以拿到最新头像
pub async fn get_me(service: &UserService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;

    get_user(service, user_id, request).await
}
