use serde::Deserialize;

// 登录请求，使用邮箱作为登录名
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
