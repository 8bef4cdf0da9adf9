use serde::Serialize;

// 登录响应
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}
