use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::FoodgramError;
use crate::models::users::requests::CreateUserRequest;
use crate::models::users::responses::UserCreatedResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    normalize_email, validate_email, validate_password, validate_person_name, validate_username,
};

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error(code, message))
}

pub async fn register_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.email = normalize_email(&user_data.email);
    user_data.username = user_data.username.trim().to_string();

    // 字段校验
    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_person_name(&user_data.first_name, "First name")
        .and_then(|_| validate_person_name(&user_data.last_name, "Last name"))
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    let password_check =
        validate_password(&user_data.password, &user_data.username, &user_data.email);
    if !password_check.is_valid {
        return Ok(bad_request(
            ErrorCode::UserPasswordInvalid,
            password_check.error_message(),
        ));
    }

    let storage = service.get_storage(request)?;

    // 唯一性
    if storage.get_user_by_email(&user_data.email).await?.is_some() {
        return Ok(bad_request(
            ErrorCode::UserAlreadyExists,
            "A user with that email already exists",
        ));
    }
    if storage
        .get_user_by_username(&user_data.username)
        .await?
        .is_some()
    {
        return Ok(bad_request(
            ErrorCode::UserAlreadyExists,
            "A user with that username already exists",
        ));
    }

    user_data.password = hash_password(&user_data.password)?;

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} registered with id {}", user.username, user.id);
            Ok(HttpResponse::Created().json(UserCreatedResponse::from(&user)))
        }
        // 并发注册撞上唯一索引
        Err(FoodgramError::Conflict(_)) => Ok(bad_request(
            ErrorCode::UserAlreadyExists,
            "A user with that email or username already exists",
        )),
        Err(e) => Err(e.into()),
    }
}
