use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IngredientService;
use crate::models::ingredients::responses::IngredientResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_ingredient(
    service: &IngredientService,
    ingredient_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_ingredient_by_id(ingredient_id).await? {
        Some(ingredient) => Ok(HttpResponse::Ok().json(IngredientResponse::from(ingredient))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error(
            ErrorCode::IngredientNotFound,
            "Ingredient not found",
        ))),
    }
}
