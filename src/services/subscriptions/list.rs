use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubscriptionService, with_recipes};
use crate::errors::FoodgramError;
use crate::middlewares::RequireJWT;
use crate::models::PaginatedResponse;
use crate::models::subscriptions::requests::{SubscriptionListParams, parse_recipes_limit};
use crate::services::users::present_users;

pub async fn list_subscriptions(
    service: &SubscriptionService,
    query: SubscriptionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;
    let storage = service.get_storage(request)?;
    let recipes_limit = parse_recipes_limit(query.recipes_limit.as_deref());

    let page = storage
        .list_subscriptions_with_pagination(
            user_id,
            query.pagination.page()?,
            query.pagination.limit(),
        )
        .await?;

    let users = present_users(storage.as_ref(), request, &page.items).await?;
    let mut results = Vec::with_capacity(users.len());
    for user in users {
        results.push(with_recipes(storage.as_ref(), request, user, recipes_limit).await?);
    }

    Ok(HttpResponse::Ok().json(PaginatedResponse::from_page(page.with_items(results), request)))
}
