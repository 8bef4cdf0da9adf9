use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::recipes::requests::{CreateRecipeRequest, RecipeListParams, UpdateRecipeRequest};
use crate::services::RecipeService;
use crate::services::recipes::RecipeCollection;
use crate::utils::SafeIDI64;

// 懒加载的全局 RecipeService 实例
static RECIPE_SERVICE: Lazy<RecipeService> = Lazy::new(RecipeService::new_lazy);

pub async fn list_recipes(
    req: HttpRequest,
    query: web::Query<RecipeListParams>,
) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE.list_recipes(query.into_inner(), &req).await
}

pub async fn create_recipe(
    req: HttpRequest,
    recipe_data: web::Json<CreateRecipeRequest>,
) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE
        .create_recipe(recipe_data.into_inner(), &req)
        .await
}

pub async fn get_recipe(req: HttpRequest, recipe_id: SafeIDI64) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE.get_recipe(recipe_id.0, &req).await
}

pub async fn update_recipe(
    req: HttpRequest,
    recipe_id: SafeIDI64,
    update_data: web::Json<UpdateRecipeRequest>,
) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE
        .update_recipe(recipe_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_recipe(req: HttpRequest, recipe_id: SafeIDI64) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE.delete_recipe(recipe_id.0, &req).await
}

pub async fn get_link(req: HttpRequest, recipe_id: SafeIDI64) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE.get_link(recipe_id.0, &req).await
}

pub async fn add_favorite(req: HttpRequest, recipe_id: SafeIDI64) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE
        .add_to_collection(RecipeCollection::Favorites, recipe_id.0, &req)
        .await
}

pub async fn remove_favorite(req: HttpRequest, recipe_id: SafeIDI64) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE
        .remove_from_collection(RecipeCollection::Favorites, recipe_id.0, &req)
        .await
}

pub async fn add_to_shopping_cart(
    req: HttpRequest,
    recipe_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE
        .add_to_collection(RecipeCollection::ShoppingCart, recipe_id.0, &req)
        .await
}

pub async fn remove_from_shopping_cart(
    req: HttpRequest,
    recipe_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE
        .remove_from_collection(RecipeCollection::ShoppingCart, recipe_id.0, &req)
        .await
}

pub async fn download_shopping_cart(req: HttpRequest) -> ActixResult<HttpResponse> {
    RECIPE_SERVICE.download_shopping_cart(&req).await
}

// 配置路由
pub fn configure_recipe_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/recipes")
            .service(
                web::resource("")
                    .wrap(RequireJWT::authenticated_or_read_only())
                    .route(web::get().to(list_recipes))
                    .route(web::post().to(create_recipe)),
            )
            .service(
                web::resource("/download_shopping_cart")
                    .wrap(RequireJWT::authenticated())
                    .route(web::get().to(download_shopping_cart)),
            )
            .service(
                web::resource("/{id}")
                    .wrap(RequireJWT::authenticated_or_read_only())
                    .route(web::get().to(get_recipe))
                    .route(web::patch().to(update_recipe))
                    .route(web::delete().to(delete_recipe)),
            )
            .service(
                web::resource("/{id}/get-link")
                    .wrap(RequireJWT::allow_any())
                    .route(web::get().to(get_link)),
            )
            .service(
                web::resource("/{id}/favorite")
                    .wrap(RequireJWT::authenticated())
                    .route(web::post().to(add_favorite))
                    .route(web::delete().to(remove_favorite)),
            )
            .service(
                web::resource("/{id}/shopping_cart")
                    .wrap(RequireJWT::authenticated())
                    .route(web::post().to(add_to_shopping_cart))
                    .route(web::delete().to(remove_from_shopping_cart)),
            ),
    );
}
