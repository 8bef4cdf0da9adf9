//! base64 data URL 图片解码
//!
//! 格式：`data:image/<ext>;base64,<payload>`

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::errors::{FoodgramError, Result};
use crate::utils::file_magic::{extension_for_subtype, sniff_image_extension};

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    /// 不带点号的小写扩展名，按文件头识别
    pub extension: &'static str,
}

pub fn decode_data_url(data: &str, max_size: usize) -> Result<DecodedImage> {
    let rest = data
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| FoodgramError::validation("Image must be a base64 data URL"))?;

    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| FoodgramError::validation("Image must be a base64 data URL"))?;

    let declared = mime
        .strip_prefix("image/")
        .and_then(extension_for_subtype)
        .ok_or_else(|| FoodgramError::validation(format!("Unsupported image type: {mime}")))?;

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    // 解码前粗略估算大小
    if payload.len() / 4 * 3 > max_size + 3 {
        return Err(FoodgramError::validation("Image is too large"));
    }

    let bytes = STANDARD.decode(payload.as_bytes())?;
    if bytes.is_empty() {
        return Err(FoodgramError::validation("Image is empty"));
    }
    if bytes.len() > max_size {
        return Err(FoodgramError::validation("Image is too large"));
    }
    let extension = sniff_image_extension(&bytes)
        .filter(|sniffed| *sniffed == declared)
        .ok_or_else(|| {
            FoodgramError::validation("Image content does not match its declared type")
        })?;

    Ok(DecodedImage { bytes, extension })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 8 字节 PNG 文件头
    const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

    #[test]
    fn test_decode_png() {
        let image = decode_data_url(PNG_DATA_URL, 1024).expect("valid png");
        assert_eq!(image.extension, "png");
        assert_eq!(image.bytes.len(), 8);
    }

    #[test]
    fn test_jpeg_subtype_saved_as_jpg() {
        let image = decode_data_url("data:image/jpeg;base64,/9j/4A==", 1024).expect("valid jpeg");
        assert_eq!(image.extension, "jpg");
    }

    #[test]
    fn test_rejects_plain_base64() {
        assert!(decode_data_url("iVBORw0KGgo=", 1024).is_err());
    }

    #[test]
    fn test_rejects_non_image_mime() {
        assert!(decode_data_url("data:text/plain;base64,aGVsbG8=", 1024).is_err());
    }

    #[test]
    fn test_rejects_mismatched_content() {
        // "hello" 声明为 png
        assert!(decode_data_url("data:image/png;base64,aGVsbG8=", 1024).is_err());
    }

    #[test]
    fn test_rejects_oversized() {
        assert!(decode_data_url(PNG_DATA_URL, 4).is_err());
    }

    #[test]
    fn test_rejects_bad_base64() {
        let err = decode_data_url("data:image/png;base64,!!!!", 1024).unwrap_err();
        assert_eq!(err.code(), "E007");
    }
}
