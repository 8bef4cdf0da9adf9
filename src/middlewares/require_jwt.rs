/*!
 * 令牌认证中间件
 *
 * 解析 `Authorization: Token <JWT>`（兼容 `Bearer <JWT>`），校验签名、过期时间和
 * 用户的 token_version，通过后把用户放进请求扩展。
 *
 * ## 访问策略
 *
 * - `RequireJWT::allow_any()`：匿名可访问，带了令牌则必须有效
 * - `RequireJWT::authenticated()`：必须登录
 * - `RequireJWT::authenticated_or_read_only()`：GET/HEAD 匿名可访问，其余方法必须登录
 *
 * ```rust,ignore
 * web::resource("/me")
 *     .wrap(RequireJWT::authenticated())
 *     .route(web::get().to(me_handler))
 * ```
 *
 * 处理函数里用 `RequireJWT::extract_user(&req)` 取当前用户。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    http::{Method, StatusCode},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

const TOKEN_PREFIXES: [&str; 2] = ["Token ", "Bearer "];

/// 访问策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    AllowAny,
    Authenticated,
    AuthenticatedOrReadOnly,
}

impl AuthPolicy {
    fn requires_user(self, method: &Method) -> bool {
        match self {
            AuthPolicy::AllowAny => false,
            AuthPolicy::Authenticated => true,
            AuthPolicy::AuthenticatedOrReadOnly => {
                !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
            }
        }
    }
}

#[derive(Clone)]
pub struct RequireJWT {
    policy: AuthPolicy,
}

impl RequireJWT {
    pub fn allow_any() -> Self {
        Self {
            policy: AuthPolicy::AllowAny,
        }
    }

    pub fn authenticated() -> Self {
        Self {
            policy: AuthPolicy::Authenticated,
        }
    }

    pub fn authenticated_or_read_only() -> Self {
        Self {
            policy: AuthPolicy::AuthenticatedOrReadOnly,
        }
    }
}

fn unauthorized(message: &str) -> HttpResponse {
    HttpResponse::build(StatusCode::UNAUTHORIZED)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::error(
            ErrorCode::Unauthorized,
            message,
        ))
}

/// 从 Authorization 头中取出令牌；没有该头时返回 Ok(None)
fn extract_token(req: &ServiceRequest) -> Result<Option<String>, &'static str> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| "Invalid Authorization header")?;

    TOKEN_PREFIXES
        .iter()
        .find_map(|prefix| value.strip_prefix(prefix))
        .map(|token| Some(token.trim().to_string()))
        .filter(|token| token.as_deref().is_some_and(|t| !t.is_empty()))
        .ok_or("Invalid Authorization header")
}

/// 已认证用户的缓存键，按用户 id 区分
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

// 校验令牌并加载用户；缓存命中时同样核对 token_version
async fn authenticate(req: &ServiceRequest, token: &str) -> Result<User, &'static str> {
    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("Token validation failed: {}", err);
        "Invalid token"
    })?;
    let user_id = claims.user_id().ok_or("Invalid token")?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());
    let cache_key = user_cache_key(user_id);

    let mut cached = None;
    if let Some(cache) = &cache {
        match cache.get_raw(&cache_key).await {
            CacheResult::Found(json) => match serde_json::from_str::<User>(&json) {
                Ok(user) if user.token_version == claims.ver => cached = Some(user),
                // 版本不一致时以数据库为准
                Ok(_) => debug!("Cached user {} has a different token version", user_id),
                Err(_) => {
                    cache.remove(&cache_key).await;
                    debug!("Dropped undecodable cached user entry");
                }
            },
            _ => debug!("User {} not cached", user_id),
        }
    }

    let user = match cached {
        Some(user) => user,
        None => {
            let storage = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone())
                .ok_or("Authentication backend unavailable")?;

            let user = storage
                .get_user_by_id(user_id)
                .await
                .map_err(|err| {
                    warn!("Failed to load user {} for authentication: {}", user_id, err);
                    "Authentication backend unavailable"
                })?
                .ok_or("Invalid token")?;

            if let (Some(cache), Ok(user_json)) = (&cache, serde_json::to_string(&user)) {
                cache
                    .insert_raw(cache_key, user_json, AppConfig::get().cache.default_ttl)
                    .await;
            }
            user
        }
    };

    if !user.is_active {
        return Err("User is inactive");
    }
    if user.token_version != claims.ver {
        return Err("Token has been revoked");
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
            policy: self.policy,
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
    policy: AuthPolicy,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let policy = self.policy;
        Box::pin(async move {
            let token = match extract_token(&req) {
                Ok(token) => token,
                Err(err) => {
                    return Ok(req.into_response(unauthorized(err).map_into_right_body()));
                }
            };

            match token {
                Some(token) => match authenticate(&req, &token).await {
                    Ok(user) => {
                        debug!("Authenticated user {}", user.id);
                        req.extensions_mut().insert(user);
                    }
                    Err(err) => {
                        info!("Authentication failed for {}: {}", req.path(), err);
                        return Ok(req.into_response(unauthorized(err).map_into_right_body()));
                    }
                },
                None if policy.requires_user(req.method()) => {
                    return Ok(req.into_response(
                        unauthorized("Authentication credentials were not provided")
                            .map_into_right_body(),
                    ));
                }
                None => {}
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

// 辅助函数：从请求中提取认证信息
impl RequireJWT {
    /// 当前登录用户，匿名请求返回 None
    pub fn extract_user(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_policy_by_method() {
        assert!(!AuthPolicy::AllowAny.requires_user(&Method::POST));
        assert!(AuthPolicy::Authenticated.requires_user(&Method::GET));
        assert!(!AuthPolicy::AuthenticatedOrReadOnly.requires_user(&Method::GET));
        assert!(AuthPolicy::AuthenticatedOrReadOnly.requires_user(&Method::PATCH));
        assert!(AuthPolicy::AuthenticatedOrReadOnly.requires_user(&Method::DELETE));
    }

    #[test]
    fn test_token_prefixes() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Token abc"))
            .to_srv_request();
        assert_eq!(extract_token(&req), Ok(Some("abc".to_string())));

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc"))
            .to_srv_request();
        assert_eq!(extract_token(&req), Ok(Some("abc".to_string())));

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic abc"))
            .to_srv_request();
        assert!(extract_token(&req).is_err());

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Token "))
            .to_srv_request();
        assert!(extract_token(&req).is_err());

        let req = TestRequest::default().to_srv_request();
        assert_eq!(extract_token(&req), Ok(None));
    }
}
