use serde::Deserialize;

use crate::models::PaginationQuery;

// 注册请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

// 用户列表查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct UserListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
}

// 修改密码
#[derive(Debug, Clone, Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// 上传头像（base64 data URL）
#[derive(Debug, Clone, Deserialize)]
pub struct SetAvatarRequest {
    #[serde(default)]
    pub avatar: Option<String>,
}
