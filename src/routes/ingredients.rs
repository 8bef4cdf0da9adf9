use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::ingredients::requests::IngredientListQuery;
use crate::services::IngredientService;
use crate::utils::SafeIDI64;

static INGREDIENT_SERVICE: Lazy<IngredientService> = Lazy::new(IngredientService::new_lazy);

pub async fn list_ingredients(
    req: HttpRequest,
    query: web::Query<IngredientListQuery>,
) -> ActixResult<HttpResponse> {
    INGREDIENT_SERVICE
        .list_ingredients(query.into_inner(), &req)
        .await
}

pub async fn get_ingredient(req: HttpRequest, ingredient_id: SafeIDI64) -> ActixResult<HttpResponse> {
    INGREDIENT_SERVICE.get_ingredient(ingredient_id.0, &req).await
}

pub fn configure_ingredient_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/ingredients")
            .wrap(RequireJWT::allow_any())
            .route("", web::get().to(list_ingredients))
            .route("/{id}", web::get().to(get_ingredient)),
    );
}
