use actix_web::{HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::config::AppConfig;
use crate::services::MediaService;

static MEDIA_SERVICE: Lazy<MediaService> = Lazy::new(MediaService::new_lazy);

pub async fn serve_media(path: web::Path<String>) -> ActixResult<HttpResponse> {
    MEDIA_SERVICE.serve(path.into_inner()).await
}

pub fn configure_media_routes(cfg: &mut web::ServiceConfig) {
    let prefix = AppConfig::get().media.url_prefix.trim_end_matches('/');
    cfg.route(
        &format!("{prefix}/{{path:.*}}"),
        web::get().to(serve_media),
    );
}
