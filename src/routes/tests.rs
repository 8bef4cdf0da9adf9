use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::middleware::NormalizePath;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use super::configure_routes;
use crate::cache::ObjectCache;
use crate::cache::object_cache::moka::MokaCacheWrapper;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::storage::sea_orm_storage::tests::{
    create_test_ingredients, create_test_recipe, create_test_user, test_storage,
};
use crate::utils::{json_error_handler, query_error_handler};

macro_rules! test_app {
    ($storage:expr) => {{
        let storage: Arc<dyn Storage> = $storage.clone();
        let cache: Arc<dyn ObjectCache> =
            Arc::new(MokaCacheWrapper::new().expect("moka cache"));
        test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(cache))
                .configure(configure_routes),
        )
        .await
    }};
}

async fn setup() -> Arc<SeaOrmStorage> {
    Arc::new(test_storage().await)
}

fn auth_header(user: &User) -> (header::HeaderName, String) {
    let token = user.generate_access_token().unwrap();
    (header::AUTHORIZATION, format!("Token {token}"))
}

#[actix_web::test]
async fn test_anonymous_access_rules() {
    let storage = setup().await;
    let app = test_app!(storage);

    let req = test::TestRequest::get().uri("/api/recipes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["results"], json!([]));

    let req = test::TestRequest::get().uri("/api/ingredients/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .set_json(json!({"name": "Борщ"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/api/users/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 带了无效令牌，即使是公开接口也拒绝
    let req = test::TestRequest::get()
        .uri("/api/recipes")
        .insert_header((header::AUTHORIZATION, "Token not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_register_login_logout() {
    let storage = setup().await;
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/users/")
        .peer_addr("10.20.0.1:40000".parse().unwrap())
        .set_json(json!({
            "email": "vasya@Example.COM",
            "username": "vasya",
            "first_name": "Вася",
            "last_name": "Пупкин",
            "password": "Qwerty-2024!x"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["email"], "vasya@example.com");
    assert!(created.get("password").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/token/login")
        .peer_addr("10.20.0.1:40000".parse().unwrap())
        .set_json(json!({"email": "vasya@example.com", "password": "wrong-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/auth/token/login")
        .peer_addr("10.20.0.1:40000".parse().unwrap())
        .set_json(json!({"email": "vasya@example.com", "password": "Qwerty-2024!x"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["auth_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/users/me/")
        .insert_header((header::AUTHORIZATION, format!("Token {token}")))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["username"], "vasya");
    assert_eq!(me["is_subscribed"], false);
    assert_eq!(me["avatar"], Value::Null);

    let req = test::TestRequest::post()
        .uri("/api/auth/token/logout")
        .insert_header((header::AUTHORIZATION, format!("Token {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header((header::AUTHORIZATION, format!("Token {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_shopping_cart_download() {
    let storage = setup().await;
    let app = test_app!(storage);

    let cook = create_test_user(&storage, "cook").await;
    let items = create_test_ingredients(&storage, &[("мука", "г"), ("яйца", "шт")]).await;
    let pancakes =
        create_test_recipe(&storage, cook.id, "Блины", &[(items[0].id, 200), (items[1].id, 2)])
            .await;
    let pie = create_test_recipe(&storage, cook.id, "Пирог", &[(items[0].id, 300)]).await;

    for recipe_id in [pancakes.id, pie.id] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/recipes/{recipe_id}/shopping_cart"))
            .insert_header(auth_header(&cook))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/recipes/{}/shopping_cart", pie.id))
        .insert_header(auth_header(&cook))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/recipes/download_shopping_cart")
        .insert_header(auth_header(&cook))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("Список покупок:"));
    assert!(text.contains("мука - 500 (г)"));
    assert!(text.contains("яйца - 2 (шт)"));

    let req = test::TestRequest::get()
        .uri("/api/recipes?is_in_shopping_cart=1")
        .insert_header(auth_header(&cook))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["is_in_shopping_cart"], true);
}

#[actix_web::test]
async fn test_recipe_permissions_and_short_link() {
    let storage = setup().await;
    let app = test_app!(storage);

    let author = create_test_user(&storage, "author").await;
    let stranger = create_test_user(&storage, "stranger").await;
    let items = create_test_ingredients(&storage, &[("свёкла", "г")]).await;
    let borscht = create_test_recipe(&storage, author.id, "Борщ", &[(items[0].id, 300)]).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/recipes/{}", borscht.id))
        .insert_header(auth_header(&stranger))
        .set_json(json!({"name": "Не борщ", "ingredients": [{"id": items[0].id, "amount": 1}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri("/api/recipes/9999")
        .insert_header(auth_header(&author))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/recipes/{}/get-link", borscht.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let link = body["short-link"].as_str().unwrap();
    let code = link.rsplit("/s/").next().unwrap();

    let req = test::TestRequest::get().uri(&format!("/s/{code}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        &format!("/recipes/{}", borscht.id)
    );

    let req = test::TestRequest::get().uri("/s/zzz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/404");
}

#[actix_web::test]
async fn test_subscriptions() {
    let storage = setup().await;
    let app = test_app!(storage);

    let reader = create_test_user(&storage, "reader").await;
    let author = create_test_user(&storage, "writer").await;
    let items = create_test_ingredients(&storage, &[("рис", "г")]).await;
    for name in ["Плов", "Ризотто", "Каша"] {
        create_test_recipe(&storage, author.id, name, &[(items[0].id, 100)]).await;
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/users/{}/subscribe", reader.id))
        .insert_header(auth_header(&reader))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/users/{}/subscribe?recipes_limit=2", author.id))
        .insert_header(auth_header(&reader))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/users/subscriptions")
        .insert_header(auth_header(&reader))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["username"], "writer");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}/subscribe", author.id))
        .insert_header(auth_header(&reader))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}/subscribe", author.id))
        .insert_header(auth_header(&reader))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_logout_revokes_other_tokens() {
    let storage = setup().await;
    let app = test_app!(storage);
    let user = create_test_user(&storage, "phone").await;

    let (name, first) = auth_header(&user);
    // 签发时间不同，得到两个不同的令牌
    actix_web::rt::time::sleep(std::time::Duration::from_millis(1100)).await;
    let (_, second) = auth_header(&user);
    assert_ne!(first, second);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header((name.clone(), second.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/token/logout")
        .insert_header((name.clone(), first.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    for token in [first, second] {
        let req = test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header((name.clone(), token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn test_create_recipe() {
    let storage = setup().await;
    let app = test_app!(storage);
    let chef = create_test_user(&storage, "chef").await;
    let items = create_test_ingredients(&storage, &[("картофель", "г"), ("соль", "г")]).await;

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .insert_header(auth_header(&chef))
        .set_json(json!({
            "ingredients": [
                {"id": items[0].id, "amount": 400},
                {"id": items[0].id, "amount": 100}
            ],
            "image": "data:image/png;base64,iVBORw0KGgo=",
            "name": "Пюре",
            "text": "Отварить и размять.",
            "cooking_time": 30
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .insert_header(auth_header(&chef))
        .set_json(json!({
            "ingredients": [{"id": items[0].id, "amount": 400}],
            "name": "Пюре",
            "text": "Отварить и размять.",
            "cooking_time": 30
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .insert_header(auth_header(&chef))
        .set_json(json!({
            "ingredients": [
                {"id": items[1].id, "amount": 5},
                {"id": items[0].id, "amount": 400}
            ],
            "image": "data:image/png;base64,iVBORw0KGgo=",
            "name": "Пюре",
            "text": "Отварить и размять.",
            "cooking_time": 30
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["author"]["username"], "chef");
    assert_eq!(body["ingredients"][0]["name"], "соль");
    assert_eq!(body["ingredients"][1]["amount"], 400);
    assert_eq!(body["is_favorited"], false);
    let image = body["image"].as_str().unwrap();
    assert!(image.contains("/recipes/") && image.ends_with(".png"));

    // 清理写入的图片
    let req = test::TestRequest::delete()
        .uri(&format!("/api/recipes/{}", body["id"]))
        .insert_header(auth_header(&chef))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn test_favorite_twice_and_missing() {
    let storage = setup().await;
    let app = test_app!(storage);
    let fan = create_test_user(&storage, "fan").await;
    let items = create_test_ingredients(&storage, &[("сахар", "г")]).await;
    let cake = create_test_recipe(&storage, fan.id, "Торт", &[(items[0].id, 150)]).await;
    let uri = format!("/api/recipes/{}/favorite", cake.id);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(auth_header(&fan))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(auth_header(&fan))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Торт");

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(auth_header(&fan))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(auth_header(&fan))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::post()
        .uri("/api/recipes/9999/favorite")
        .insert_header(auth_header(&fan))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_short_link_to_missing_recipe() {
    let storage = setup().await;
    let app = test_app!(storage);

    // 0x270f = 9999
    let req = test::TestRequest::get().uri("/s/270f").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/404");
}

#[actix_web::test]
async fn test_pagination_bounds() {
    let storage = setup().await;
    let app = test_app!(storage);
    let reader = create_test_user(&storage, "reader").await;
    let author = create_test_user(&storage, "author").await;
    let items = create_test_ingredients(&storage, &[("гречка", "г")]).await;
    for name in ["Гречка", "Гречневая каша"] {
        create_test_recipe(&storage, author.id, name, &[(items[0].id, 100)]).await;
    }

    for uri in [
        "/api/recipes?page=9223372036854775807&limit=100",
        "/api/recipes?page=18446744073709551615",
        "/api/recipes?page=0",
        "/api/recipes?page=abc",
        "/api/recipes?page=2",
        "/api/users?page=9223372036854775807",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    // 无效 limit 退回默认每页数量
    let req = test::TestRequest::get()
        .uri("/api/recipes?limit=abc")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/recipes?limit=1&page=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["next"], Value::Null);
    assert!(body["previous"].as_str().unwrap().ends_with("/api/recipes?limit=1"));

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/users/{}/subscribe?recipes_limit=18446744073709551615",
            author.id
        ))
        .insert_header(auth_header(&reader))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/users/subscriptions?recipes_limit=99999999999999999999999&page=1")
        .insert_header(auth_header(&reader))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["recipes"].as_array().unwrap().len(), 2);
}
