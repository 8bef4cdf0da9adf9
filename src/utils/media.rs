//! 媒体文件存储与访问地址

use std::path::{Component, Path, PathBuf};

use actix_web::HttpRequest;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::utils::image::DecodedImage;

/// 媒体子目录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Recipe,
    Avatar,
}

impl MediaKind {
    fn dir(self) -> &'static str {
        match self {
            MediaKind::Recipe => "recipes",
            MediaKind::Avatar => "users",
        }
    }
}

/// 保存图片，返回相对媒体根目录的路径
pub fn save_image(kind: MediaKind, image: &DecodedImage) -> Result<String> {
    let root = &AppConfig::get().media.root;
    let relative = format!("{}/{}.{}", kind.dir(), Uuid::new_v4(), image.extension);
    let full = Path::new(root).join(&relative);

    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&full, &image.bytes)?;
    debug!("Stored media file {}", full.display());

    Ok(relative)
}

/// 删除媒体文件，失败只记录日志
pub fn remove_file(relative: &str) {
    let Some(path) = resolve_media_path(relative) else {
        return;
    };
    match std::fs::remove_file(&path) {
        Ok(()) => debug!("Removed media file {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove media file {}: {}", path.display(), e),
    }
}

/// 把请求路径映射到媒体根目录下，拒绝越界路径
pub fn resolve_media_path(relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    if relative.as_os_str().is_empty()
        || !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(Path::new(&AppConfig::get().media.root).join(relative))
}

/// 当前请求的 scheme://host
pub fn request_origin(request: &HttpRequest) -> String {
    let conn = request.connection_info();
    format!("{}://{}", conn.scheme(), conn.host())
}

/// 媒体文件的绝对地址
pub fn media_url(request: &HttpRequest, relative: &str) -> String {
    let prefix = AppConfig::get().media.url_prefix.trim_end_matches('/');
    format!("{}{}/{}", request_origin(request), prefix, relative)
}

/// 按扩展名推断 Content-Type
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_resolve_rejects_traversal() {
        assert!(resolve_media_path("../etc/passwd").is_none());
        assert!(resolve_media_path("/etc/passwd").is_none());
        assert!(resolve_media_path("recipes/../../x").is_none());
        assert!(resolve_media_path("").is_none());
        assert!(resolve_media_path("recipes/a.png").is_some());
    }

    #[test]
    fn test_media_url() {
        let req = TestRequest::default()
            .insert_header(("Host", "foodgram.example"))
            .to_http_request();
        assert_eq!(
            media_url(&req, "recipes/a.png"),
            "http://foodgram.example/media/recipes/a.png"
        );
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for(Path::new("a.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a")), "application/octet-stream");
    }
}
