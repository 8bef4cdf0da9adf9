use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT};
use crate::models::subscriptions::requests::{SubscribeParams, SubscriptionListParams};
use crate::models::users::requests::{
    CreateUserRequest, SetAvatarRequest, SetPasswordRequest, UserListParams,
};
use crate::services::{SubscriptionService, UserService};
use crate::utils::SafeIDI64;

// 懒加载的全局服务实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);
static SUBSCRIPTION_SERVICE: Lazy<SubscriptionService> =
    Lazy::new(SubscriptionService::new_lazy);

// HTTP处理程序
pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn register(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.register(user_data.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(user_id.0, &req).await
}

pub async fn me(req: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.me(&req).await
}

pub async fn set_password(
    req: HttpRequest,
    password_data: web::Json<SetPasswordRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .set_password(password_data.into_inner(), &req)
        .await
}

// 头像总是作用于当前用户，路径里的 id 不参与
pub async fn set_avatar(
    req: HttpRequest,
    avatar_data: web::Json<SetAvatarRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.set_avatar(avatar_data.into_inner(), &req).await
}

pub async fn delete_avatar(req: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_avatar(&req).await
}

pub async fn list_subscriptions(
    req: HttpRequest,
    query: web::Query<SubscriptionListParams>,
) -> ActixResult<HttpResponse> {
    SUBSCRIPTION_SERVICE
        .list_subscriptions(query.into_inner(), &req)
        .await
}

pub async fn subscribe(
    req: HttpRequest,
    author_id: SafeIDI64,
    query: web::Query<SubscribeParams>,
) -> ActixResult<HttpResponse> {
    SUBSCRIPTION_SERVICE
        .subscribe(author_id.0, query.into_inner(), &req)
        .await
}

pub async fn unsubscribe(req: HttpRequest, author_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBSCRIPTION_SERVICE.unsubscribe(author_id.0, &req).await
}

// 配置路由，固定路径需放在 /{id} 之前
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .service(
                web::resource("")
                    .wrap(RequireJWT::allow_any())
                    .wrap(RateLimit::register())
                    .route(web::get().to(list_users))
                    .route(web::post().to(register)),
            )
            .service(
                web::resource("/me")
                    .wrap(RequireJWT::authenticated())
                    .route(web::get().to(me)),
            )
            .service(
                web::resource("/me/avatar")
                    .wrap(RequireJWT::authenticated())
                    .route(web::put().to(set_avatar))
                    .route(web::delete().to(delete_avatar)),
            )
            .service(
                web::resource("/set_password")
                    .wrap(RequireJWT::authenticated())
                    .route(web::post().to(set_password)),
            )
            .service(
                web::resource("/subscriptions")
                    .wrap(RequireJWT::authenticated())
                    .route(web::get().to(list_subscriptions)),
            )
            .service(
                web::resource("/{id}")
                    .wrap(RequireJWT::allow_any())
                    .route(web::get().to(get_user)),
            )
            .service(
                web::resource("/{id}/avatar")
                    .wrap(RequireJWT::authenticated())
                    .route(web::put().to(set_avatar))
                    .route(web::delete().to(delete_avatar)),
            )
            .service(
                web::resource("/{id}/subscribe")
                    .wrap(RequireJWT::authenticated())
                    .route(web::post().to(subscribe))
                    .route(web::delete().to(unsubscribe)),
            ),
    );
}
