//! 媒体文件读取

use actix_web::{HttpResponse, Result as ActixResult, http::header, web};
use std::io::ErrorKind;
use tracing::warn;

use crate::errors::FoodgramError;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::media::{content_type_for, resolve_media_path};

pub struct MediaService;

impl MediaService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn serve(&self, relative: String) -> ActixResult<HttpResponse> {
        let Some(path) = resolve_media_path(&relative) else {
            return Ok(not_found());
        };

        let content_type = content_type_for(&path);
        let read_path = path.clone();
        let bytes = web::block(move || std::fs::read(read_path))
            .await
            .map_err(|e| FoodgramError::internal(format!("Media read task failed: {e}")))?;

        match bytes {
            Ok(bytes) => Ok(HttpResponse::Ok()
                .insert_header((header::CONTENT_TYPE, content_type))
                .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
                .body(bytes)),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                Ok(not_found())
            }
            Err(e) => {
                warn!("Failed to read media file {}: {}", path.display(), e);
                Err(FoodgramError::from(e).into())
            }
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error(ErrorCode::NotFound, "File not found"))
}
