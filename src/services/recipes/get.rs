use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RecipeService, present_recipe, recipe_not_found};

pub async fn get_recipe(
    service: &RecipeService,
    recipe_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_recipe_by_id(recipe_id).await? {
        Some(recipe) => {
            let response = present_recipe(storage.as_ref(), request, recipe).await?;
            Ok(HttpResponse::Ok().json(response))
        }
        None => Ok(recipe_not_found()),
    }
}
