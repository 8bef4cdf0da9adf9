use actix_web::{HttpRequest, HttpResponse, web};
use once_cell::sync::Lazy;

use crate::services::ShortLinkService;

static SHORT_LINK_SERVICE: Lazy<ShortLinkService> = Lazy::new(ShortLinkService::new_lazy);

pub async fn redirect(req: HttpRequest, code: web::Path<String>) -> HttpResponse {
    SHORT_LINK_SERVICE.redirect(&code, &req).await
}

pub fn configure_short_link_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/s/{code}", web::get().to(redirect));
}
