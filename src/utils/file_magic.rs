/// 根据文件头识别图片格式，返回规范化的扩展名（jpeg 统一为 jpg）
pub fn sniff_image_extension(data: &[u8]) -> Option<&'static str> {
    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    if data.starts_with(PNG) {
        Some("png")
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("gif")
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("webp")
    } else if data.starts_with(b"BM") {
        Some("bmp")
    } else {
        None
    }
}

/// MIME 子类型对应的扩展名
pub fn extension_for_subtype(subtype: &str) -> Option<&'static str> {
    match subtype.to_ascii_lowercase().as_str() {
        "png" => Some("png"),
        "jpg" | "jpeg" | "pjpeg" => Some("jpg"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        "bmp" | "x-ms-bmp" => Some("bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_known_formats() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert_eq!(sniff_image_extension(&png), Some("png"));
        assert_eq!(sniff_image_extension(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("jpg"));
        assert_eq!(sniff_image_extension(b"GIF89a...."), Some("gif"));
        assert_eq!(
            sniff_image_extension(b"RIFF\x24\x00\x00\x00WEBPVP8 "),
            Some("webp")
        );
    }

    #[test]
    fn test_sniff_rejects_other_content() {
        assert_eq!(sniff_image_extension(&[]), None);
        assert_eq!(sniff_image_extension(b"RIFF"), None);
        assert_eq!(sniff_image_extension(b"%PDF-1.4"), None);
        assert_eq!(sniff_image_extension(b"<svg></svg>"), None);
    }

    #[test]
    fn test_subtype_aliases() {
        assert_eq!(extension_for_subtype("JPEG"), Some("jpg"));
        assert_eq!(extension_for_subtype("jpg"), Some("jpg"));
        assert_eq!(extension_for_subtype("svg+xml"), None);
    }
}
