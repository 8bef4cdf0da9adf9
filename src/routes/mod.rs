pub mod auth;

pub mod users;

pub mod ingredients;

pub mod recipes;

pub mod short_links;

pub mod media;

#[cfg(test)]
mod tests;

pub use auth::configure_auth_routes;
pub use ingredients::configure_ingredient_routes;
pub use media::configure_media_routes;
pub use recipes::configure_recipe_routes;
pub use short_links::configure_short_link_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_ingredient_routes)
        .configure(configure_recipe_routes)
        .configure(configure_short_link_routes)
        .configure(configure_media_routes);
}
