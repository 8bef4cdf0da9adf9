use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RecipeService, recipe_not_found};
use crate::models::recipes::responses::ShortLinkResponse;
use crate::utils::media::request_origin;
use crate::utils::short_link;

pub async fn get_link(
    service: &RecipeService,
    recipe_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(recipe) = storage.get_recipe_by_id(recipe_id).await? else {
        return Ok(recipe_not_found());
    };

    let short_link = format!(
        "{}/s/{}",
        request_origin(request),
        short_link::encode(recipe.id)
    );
    Ok(HttpResponse::Ok().json(ShortLinkResponse { short_link }))
}
