use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RecipeService, present_recipes};
use crate::middlewares::RequireJWT;
use crate::models::recipes::entities::RecipeFilter;
use crate::models::recipes::requests::RecipeListParams;
use crate::models::{ApiResponse, ErrorCode, PaginatedResponse};

/// `is_favorited` / `is_in_shopping_cart` 只接受 0 或 1
fn parse_flag(raw: Option<&str>, field: &str) -> Result<bool, String> {
    match raw.map(str::trim) {
        None | Some("") | Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(other) => Err(format!("{field} must be 0 or 1, got '{other}'")),
    }
}

/// 把查询参数转换为存储层的筛选条件
pub(crate) fn build_filter(
    query: &RecipeListParams,
    viewer_id: Option<i64>,
) -> Result<RecipeFilter, String> {
    let author_id = match query.author.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| format!("author must be an integer, got '{raw}'"))?,
        ),
    };

    let is_favorited = parse_flag(query.is_favorited.as_deref(), "is_favorited")?;
    let is_in_shopping_cart =
        parse_flag(query.is_in_shopping_cart.as_deref(), "is_in_shopping_cart")?;

    // 匿名用户忽略这两个筛选
    Ok(RecipeFilter {
        author_id,
        favorited_by: viewer_id.filter(|_| is_favorited),
        in_cart_of: viewer_id.filter(|_| is_in_shopping_cart),
    })
}

pub async fn list_recipes(
    service: &RecipeService,
    query: RecipeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let filter = match build_filter(&query, RequireJWT::extract_user_id(request)) {
        Ok(filter) => filter,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error(ErrorCode::BadRequest, msg)));
        }
    };

    let storage = service.get_storage(request)?;
    let mut page = storage
        .list_recipes_with_pagination(filter, query.pagination.page()?, query.pagination.limit())
        .await?;

    let items = std::mem::take(&mut page.items);
    let recipes = present_recipes(storage.as_ref(), request, items).await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::from_page(page.with_items(recipes), request)))
}
