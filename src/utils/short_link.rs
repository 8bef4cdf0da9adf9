//! 菜谱短链接：id 的小写十六进制

pub fn encode(recipe_id: i64) -> String {
    format!("{recipe_id:x}")
}

/// 解析失败或溢出时返回 None
pub fn decode(code: &str) -> Option<i64> {
    let hex = code
        .strip_prefix("0x")
        .or_else(|| code.strip_prefix("0X"))
        .unwrap_or(code);
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    i64::from_str_radix(hex, 16).ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(1), "1");
        assert_eq!(encode(255), "ff");
        assert_eq!(encode(4096), "1000");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("ff"), Some(255));
        assert_eq!(decode("FF"), Some(255));
        assert_eq!(decode("0x1a"), Some(26));
        assert_eq!(decode(&encode(123_456)), Some(123_456));
    }

    #[test]
    fn test_decode_invalid() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("zz"), None);
        assert_eq!(decode("+1"), None);
        assert_eq!(decode("0"), None);
        assert_eq!(decode("ffffffffffffffffff"), None);
    }
}
