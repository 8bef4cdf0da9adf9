use serde::Deserialize;

use crate::models::PaginationQuery;

// 订阅列表查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub recipes_limit: Option<String>,
}

// 订阅时的查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscribeParams {
    pub recipes_limit: Option<String>,
}

/// 数据库 LIMIT 能接受的最大值
pub const MAX_RECIPES_LIMIT: u64 = i64::MAX as u64;

/// 只接受纯数字的 recipes_limit，其余情况视为不限制；过大的值截到 `MAX_RECIPES_LIMIT`
pub fn parse_recipes_limit(raw: Option<&str>) -> Option<u64> {
    raw.filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .map(|s| s.parse::<u64>().map_or(MAX_RECIPES_LIMIT, |n| n.min(MAX_RECIPES_LIMIT)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipes_limit() {
        assert_eq!(parse_recipes_limit(Some("3")), Some(3));
        assert_eq!(parse_recipes_limit(Some("0")), Some(0));
        assert_eq!(parse_recipes_limit(Some("-1")), None);
        assert_eq!(parse_recipes_limit(Some("abc")), None);
        assert_eq!(parse_recipes_limit(Some("")), None);
        assert_eq!(parse_recipes_limit(None), None);
    }

    #[test]
    fn test_recipes_limit_saturates() {
        assert_eq!(
            parse_recipes_limit(Some("18446744073709551615")),
            Some(MAX_RECIPES_LIMIT)
        );
        assert_eq!(
            parse_recipes_limit(Some("99999999999999999999999999")),
            Some(MAX_RECIPES_LIMIT)
        );
        assert_eq!(
            parse_recipes_limit(Some("9223372036854775807")),
            Some(i64::MAX as u64)
        );
    }
}
