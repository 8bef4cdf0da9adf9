use actix_web::HttpRequest;
use serde::{Deserialize, Serialize};

use crate::errors::{FoodgramError, Result};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

// 分页查询参数：?page=N&limit=M，原样保留字符串，取值时再解析
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl PaginationQuery {
    /// 页码，从 1 开始；不是正整数时返回 404
    pub fn page(&self) -> Result<u64> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Ok(1),
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(invalid_page),
        }
    }

    /// 每页数量；无效值退回默认值，上限 100
    pub fn limit(&self) -> u64 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|limit| *limit >= 1)
            .map_or(DEFAULT_PAGE_SIZE, |limit| limit.min(MAX_PAGE_SIZE))
    }
}

fn invalid_page() -> FoodgramError {
    FoodgramError::not_found("Invalid page.")
}

/// 校验页码是否落在结果范围内，返回从 0 开始的页序号
///
/// 第 1 页总是有效（结果为空时也返回空列表），其余页必须有数据。
pub fn page_index(page: u64, limit: u64, total: u64) -> Result<u64> {
    let index = page.checked_sub(1).ok_or_else(invalid_page)?;
    if index == 0 {
        return Ok(0);
    }
    match index.checked_mul(limit) {
        Some(offset) if offset < total => Ok(index),
        _ => Err(invalid_page()),
    }
}

/// 存储层返回的一页数据
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.page.saturating_mul(self.limit) < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// 保留分页信息，替换本页数据
    pub fn with_items<U>(self, items: Vec<U>) -> Paginated<U> {
        Paginated {
            items,
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

// 分页列表响应 {count, next, previous, results}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    /// 根据当前请求生成上一页/下一页链接
    pub fn from_page(page: Paginated<T>, request: &HttpRequest) -> Self {
        let conn = request.connection_info();
        let base = format!("{}://{}{}", conn.scheme(), conn.host(), request.path());
        let query = request.query_string();

        let next = page
            .has_next()
            .then(|| build_page_url(&base, query, Some(page.page + 1)));
        // 第 2 页的上一页不带 page 参数
        let previous = page.has_previous().then(|| {
            let target = page.page - 1;
            build_page_url(&base, query, (target > 1).then_some(target))
        });

        Self {
            count: page.total,
            next,
            previous,
            results: page.items,
        }
    }
}

/// 替换查询串中的 page 参数
pub fn build_page_url(base: &str, query: &str, page: Option<u64>) -> String {
    let mut pairs: Vec<String> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && *pair != "page" && !pair.starts_with("page="))
        .map(str::to_string)
        .collect();

    if let Some(page) = page {
        pairs.push(format!("page={page}"));
    }

    if pairs.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web;

    fn query(raw: &str) -> PaginationQuery {
        web::Query::<PaginationQuery>::from_query(raw)
            .expect("valid query")
            .into_inner()
    }

    #[test]
    fn test_limit_falls_back_to_default() {
        assert_eq!(query("limit=6").limit(), 6);
        assert_eq!(query("limit=1000").limit(), 100);
        assert_eq!(query("limit=0").limit(), 10);
        assert_eq!(query("limit=-5").limit(), 10);
        assert_eq!(query("limit=abc").limit(), 10);
        assert_eq!(query("").limit(), 10);
    }

    #[test]
    fn test_page_must_be_positive() {
        assert_eq!(query("").page().unwrap(), 1);
        assert_eq!(query("page=3&limit=6").page().unwrap(), 3);
        assert_eq!(
            query("page=9223372036854775807").page().unwrap(),
            i64::MAX as u64
        );
        for raw in ["page=0", "page=-1", "page=abc", "page=99999999999999999999999"] {
            let err = query(raw).page().unwrap_err();
            assert!(matches!(err, FoodgramError::NotFound(_)), "{raw}");
        }
    }

    #[test]
    fn test_page_index_bounds() {
        assert_eq!(page_index(1, 10, 0).unwrap(), 0);
        assert_eq!(page_index(3, 10, 21).unwrap(), 2);
        assert!(page_index(4, 10, 30).is_err());
        assert!(page_index(2, 10, 0).is_err());
        assert!(page_index(i64::MAX as u64, 100, 5).is_err());
        assert!(page_index(u64::MAX, u64::MAX, u64::MAX).is_err());
    }

    #[test]
    fn test_build_page_url() {
        let base = "http://localhost/api/recipes/";
        assert_eq!(
            build_page_url(base, "limit=6&page=2&author=1", Some(3)),
            "http://localhost/api/recipes/?limit=6&author=1&page=3"
        );
        assert_eq!(
            build_page_url(base, "page=2&limit=6", None),
            "http://localhost/api/recipes/?limit=6"
        );
        assert_eq!(build_page_url(base, "page=2", None), base);
    }

    #[test]
    fn test_has_next_and_previous() {
        let page = Paginated::<i32> {
            items: vec![],
            total: 21,
            page: 2,
            limit: 10,
        };
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Paginated::<i32> {
            items: vec![],
            total: 21,
            page: 3,
            limit: 10,
        };
        assert!(!last.has_next());
    }
}
