use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::config::AppConfig;
use crate::errors::FoodgramError;
use crate::middlewares::RequireJWT;
use crate::models::users::requests::SetAvatarRequest;
use crate::models::users::responses::AvatarResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::image::decode_data_url;
use crate::utils::media::{self, MediaKind};

pub async fn set_avatar(
    service: &UserService,
    avatar_data: SetAvatarRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;

    let Some(data) = avatar_data.avatar.filter(|data| !data.trim().is_empty()) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::ImageInvalid,
            "Avatar is required",
        )));
    };

    let image = decode_data_url(&data, AppConfig::get().media.max_image_size)?;

    let storage = service.get_storage(request)?;
    let user = storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| FoodgramError::authentication("User not found"))?;

    let relative = media::save_image(MediaKind::Avatar, &image)?;
    if let Err(e) = storage.update_avatar(user.id, Some(relative.clone())).await {
        media::remove_file(&relative);
        return Err(e.into());
    }
    if let Some(old) = user.avatar.as_deref() {
        media::remove_file(old);
    }

    info!("User {} updated avatar", user.id);
    Ok(HttpResponse::Ok().json(AvatarResponse {
        avatar: media::media_url(request, &relative),
    }))
}

pub async fn delete_avatar(service: &UserService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;
    let storage = service.get_storage(request)?;
    let user = storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| FoodgramError::authentication("User not found"))?;

    let Some(avatar) = user.avatar else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::AvatarNotSet,
            "Avatar is not set",
        )));
    };

    storage.update_avatar(user.id, None).await?;
    media::remove_file(&avatar);

    info!("User {} removed avatar", user.id);
    Ok(HttpResponse::NoContent().finish())
}
