pub mod avatar;
pub mod get;
pub mod list;
pub mod password;
pub mod register;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::users::requests::{
    CreateUserRequest, SetAvatarRequest, SetPasswordRequest, UserListParams,
};
use crate::models::users::responses::UserResponse;
use crate::storage::Storage;
use crate::utils::media::media_url;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 注册
    pub async fn register(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::register_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 当前用户
    pub async fn me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_me(self, request).await
    }

    // 修改密码
    pub async fn set_password(
        &self,
        password_data: SetPasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::set_password(self, password_data, request).await
    }

    // 上传头像
    pub async fn set_avatar(
        &self,
        avatar_data: SetAvatarRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        avatar::set_avatar(self, avatar_data, request).await
    }

    // 删除头像
    pub async fn delete_avatar(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        avatar::delete_avatar(self, request).await
    }
}

/// 头像的绝对地址
pub(crate) fn avatar_url(request: &HttpRequest, user: &User) -> Option<String> {
    user.avatar
        .as_deref()
        .map(|avatar| media_url(request, avatar))
}

/// 批量生成用户表示，is_subscribed 相对当前请求者计算
pub(crate) async fn present_users(
    storage: &dyn Storage,
    request: &HttpRequest,
    users: &[User],
) -> Result<Vec<UserResponse>> {
    let subscribed = match RequireJWT::extract_user_id(request) {
        Some(viewer_id) if !users.is_empty() => {
            let ids: Vec<i64> = users.iter().map(|user| user.id).collect();
            storage.subscribed_author_ids(viewer_id, &ids).await?
        }
        _ => HashSet::new(),
    };

    Ok(users
        .iter()
        .map(|user| {
            UserResponse::new(
                user,
                subscribed.contains(&user.id),
                avatar_url(request, user),
            )
        })
        .collect())
}

/// 单个用户表示
pub(crate) async fn present_user(
    storage: &dyn Storage,
    request: &HttpRequest,
    user: &User,
) -> Result<UserResponse> {
    let is_subscribed = match RequireJWT::extract_user_id(request) {
        Some(viewer_id) => storage.is_subscribed(viewer_id, user.id).await?,
        None => false,
    };
    Ok(UserResponse::new(
        user,
        is_subscribed,
        avatar_url(request, user),
    ))
}
