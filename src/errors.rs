//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 错误同时实现 `actix_web::ResponseError`，服务层可以直接用 `?` 返回。

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::SqlErr;
use std::fmt;

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_foodgram_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum FoodgramError {
            $($variant(String),)*
        }

        impl FoodgramError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(FoodgramError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(FoodgramError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(FoodgramError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl FoodgramError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        FoodgramError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_foodgram_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Duplicate Entry"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    Internal("E013", "Internal Error"),
}

impl FoodgramError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的业务错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            FoodgramError::Validation(_) => ErrorCode::ValidationFailed,
            FoodgramError::Conflict(_) => ErrorCode::AlreadyExists,
            FoodgramError::NotFound(_) => ErrorCode::NotFound,
            FoodgramError::Authentication(_) => ErrorCode::Unauthorized,
            FoodgramError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl fmt::Display for FoodgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for FoodgramError {}

impl ResponseError for FoodgramError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 重复记录与校验失败一样返回 400
            FoodgramError::Validation(_) | FoodgramError::Conflict(_) => StatusCode::BAD_REQUEST,
            FoodgramError::NotFound(_) => StatusCode::NOT_FOUND,
            FoodgramError::Authentication(_) => StatusCode::UNAUTHORIZED,
            FoodgramError::Authorization(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{} {}", self.code(), self.format_simple());
        }
        HttpResponse::build(status).json(ApiResponse::error(
            self.api_code(),
            self.message().to_string(),
        ))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for FoodgramError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => FoodgramError::Conflict(msg),
            _ => FoodgramError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for FoodgramError {
    fn from(err: std::io::Error) -> Self {
        FoodgramError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for FoodgramError {
    fn from(err: serde_json::Error) -> Self {
        FoodgramError::Serialization(err.to_string())
    }
}

impl From<base64::DecodeError> for FoodgramError {
    fn from(err: base64::DecodeError) -> Self {
        FoodgramError::Validation(format!("Invalid base64 payload: {err}"))
    }
}

impl From<jsonwebtoken::errors::Error> for FoodgramError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        FoodgramError::Internal(format!("Token generation failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, FoodgramError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(FoodgramError::cache_connection("test").code(), "E001");
        assert_eq!(FoodgramError::database_config("test").code(), "E003");
        assert_eq!(FoodgramError::validation("test").code(), "E007");
        assert_eq!(FoodgramError::conflict("test").code(), "E010");
        assert_eq!(FoodgramError::authentication("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            FoodgramError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            FoodgramError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = FoodgramError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = FoodgramError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            FoodgramError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FoodgramError::conflict("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FoodgramError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            FoodgramError::authentication("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            FoodgramError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            FoodgramError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_base64_error_is_validation() {
        use base64::Engine;
        let err: FoodgramError = base64::engine::general_purpose::STANDARD
            .decode("***")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "E007");
    }
}
