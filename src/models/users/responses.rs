use serde::Serialize;

use super::entities::User;

// 注册成功响应
#[derive(Debug, Clone, Serialize)]
pub struct UserCreatedResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserCreatedResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

// 用户响应
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserResponse {
    /// `avatar_url` 为已经拼接好的绝对地址
    pub fn new(user: &User, is_subscribed: bool, avatar_url: Option<String>) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
            avatar: avatar_url,
        }
    }
}

// 头像响应
#[derive(Debug, Clone, Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}
