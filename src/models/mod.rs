//! 数据模型定义
//!
//! 请求、响应与业务实体，和 `entity` 中的数据库模型分离。

pub mod auth;
pub mod common;
pub mod ingredients;
pub mod recipes;
pub mod subscriptions;
pub mod users;

pub use common::pagination::{Paginated, PaginatedResponse, PaginationQuery};
pub use common::response::ApiResponse;

use serde::{Deserialize, Serialize};

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    AlreadyExists = 1005,
    RateLimitExceeded = 1006,
    InternalServerError = 1999,

    // 认证与用户 2xxx
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserNameInvalid = 2002,
    UserEmailInvalid = 2003,
    UserPasswordInvalid = 2004,
    UserAlreadyExists = 2005,
    AvatarNotSet = 2006,

    // 订阅 3xxx
    SubscriptionSelf = 3000,
    SubscriptionExists = 3001,
    SubscriptionNotFound = 3002,

    // 菜谱与食材 4xxx
    RecipeNotFound = 4000,
    RecipeInvalid = 4001,
    IngredientNotFound = 4002,
    FavoriteExists = 4003,
    FavoriteNotFound = 4004,
    ShoppingCartExists = 4005,
    ShoppingCartNotFound = 4006,
    ImageInvalid = 4007,
}
