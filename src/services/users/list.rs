use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, present_users};
use crate::models::PaginatedResponse;
use crate::models::users::requests::UserListParams;

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let page = storage
        .list_users_with_pagination(query.pagination.page()?, query.pagination.limit())
        .await?;

    let users = present_users(storage.as_ref(), request, &page.items).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::from_page(page.with_items(users), request)))
}
