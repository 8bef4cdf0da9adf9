use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubscriptionService, with_recipes};
use crate::errors::FoodgramError;
use crate::middlewares::RequireJWT;
use crate::models::subscriptions::requests::{SubscribeParams, parse_recipes_limit};
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::users::avatar_url;

pub async fn subscribe(
    service: &SubscriptionService,
    author_id: i64,
    query: SubscribeParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;
    let storage = service.get_storage(request)?;

    let Some(author) = storage.get_user_by_id(author_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error(
            ErrorCode::UserNotFound,
            "User not found",
        )));
    };

    if author.id == user_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::SubscriptionSelf,
            "You cannot subscribe to yourself",
        )));
    }

    match storage.create_subscription(user_id, author.id).await {
        Ok(()) => {}
        Err(FoodgramError::Conflict(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
                ErrorCode::SubscriptionExists,
                "You are already subscribed to this user",
            )));
        }
        Err(e) => return Err(e.into()),
    }

    info!("User {} subscribed to {}", user_id, author.id);

    let user = UserResponse::new(&author, true, avatar_url(request, &author));
    let recipes_limit = parse_recipes_limit(query.recipes_limit.as_deref());
    let response = with_recipes(storage.as_ref(), request, user, recipes_limit).await?;
    Ok(HttpResponse::Created().json(response))
}

pub async fn unsubscribe(
    service: &SubscriptionService,
    author_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;
    let storage = service.get_storage(request)?;

    if storage.get_user_by_id(author_id).await?.is_none() {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error(
            ErrorCode::UserNotFound,
            "User not found",
        )));
    }

    if !storage.delete_subscription(user_id, author_id).await? {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::SubscriptionNotFound,
            "You are not subscribed to this user",
        )));
    }

    info!("User {} unsubscribed from {}", user_id, author_id);
    Ok(HttpResponse::NoContent().finish())
}
