mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use common::register_user;
use linkboard::db::MemoryStore;

#[actix_web::test]
async fn anonymous_requests_are_rejected() {
    let app = test::init_service(common::test_app(Arc::new(MemoryStore::new()))).await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/favorites").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Unauthorized"));

    let resp = test::call_service(
        &app,
        common::json_post(
            "/favorites",
            json!({"platform": "youtube", "url": "https://y.com/1"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn listing_is_newest_first() {
    let app = test::init_service(common::test_app(Arc::new(MemoryStore::new()))).await;
    let cookie = register_user!(&app, "alice@example.com");

    for url in ["https://y.com/first", "https://y.com/second"] {
        let resp = test::call_service(
            &app,
            common::json_post("/favorites", json!({"platform": "youtube", "url": url}))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/favorites")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let favorites: Vec<Value> = test::read_body_json(resp).await;

    assert_eq!(favorites.len(), 2);
    assert_eq!(favorites[0]["url"], json!("https://y.com/second"));
    assert_eq!(favorites[1]["url"], json!("https://y.com/first"));
}

#[actix_web::test]
async fn created_favorite_echoes_assigned_fields() {
    let app = test::init_service(common::test_app(Arc::new(MemoryStore::new()))).await;
    let cookie = register_user!(&app, "alice@example.com");

    let resp = test::call_service(
        &app,
        common::json_post(
            "/favorites",
            json!({
                "platform": "github",
                "url": "https://github.com/rust-lang/rust",
                "title": "rustc",
                "description": "The compiler"
            }),
        )
        .cookie(cookie)
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;

    assert!(!created["id"].as_str().unwrap_or_default().is_empty());
    assert!(!created["user_id"].as_str().unwrap_or_default().is_empty());
    assert_eq!(created["platform"], json!("github"));
    assert_eq!(created["url"], json!("https://github.com/rust-lang/rust"));
    assert_eq!(created["title"], json!("rustc"));
    assert_eq!(created["description"], json!("The compiler"));
    assert!(created["created_at"].is_string());
}

#[actix_web::test]
async fn optional_metadata_is_omitted_when_absent() {
    let app = test::init_service(common::test_app(Arc::new(MemoryStore::new()))).await;
    let cookie = register_user!(&app, "alice@example.com");

    let resp = test::call_service(
        &app,
        common::json_post(
            "/favorites",
            json!({"platform": "youtube", "url": "https://y.com/1"}),
        )
        .cookie(cookie)
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;

    assert!(created.get("title").is_none());
    assert!(created.get("description").is_none());
}

#[actix_web::test]
async fn missing_required_fields_are_rejected() {
    let app = test::init_service(common::test_app(Arc::new(MemoryStore::new()))).await;
    let cookie = register_user!(&app, "alice@example.com");

    for body in [
        json!({"platform": "youtube"}),
        json!({"url": "https://y.com/1"}),
        json!({"platform": "", "url": "https://y.com/1"}),
        json!({"platform": "youtube", "url": ""}),
    ] {
        let resp = test::call_service(
            &app,
            common::json_post("/favorites", body)
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["error"], json!("Platform and URL required"));
    }
}

#[actix_web::test]
async fn owners_never_see_each_other() {
    let app = test::init_service(common::test_app(Arc::new(MemoryStore::new()))).await;
    let alice = register_user!(&app, "alice@example.com");
    let bob = register_user!(&app, "bob@example.com");

    let resp = test::call_service(
        &app,
        common::json_post(
            "/favorites",
            json!({"platform": "youtube", "url": "https://y.com/alice"}),
        )
        .cookie(alice.clone())
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        common::json_post(
            "/favorites",
            json!({"platform": "github", "url": "https://g.com/bob"}),
        )
        .cookie(bob.clone())
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/favorites")
            .cookie(alice)
            .to_request(),
    )
    .await;
    let alice_favorites: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(alice_favorites.len(), 1);
    assert_eq!(alice_favorites[0]["url"], json!("https://y.com/alice"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/favorites")
            .cookie(bob)
            .to_request(),
    )
    .await;
    let bob_favorites: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(bob_favorites.len(), 1);
    assert_eq!(bob_favorites[0]["url"], json!("https://g.com/bob"));

    assert_ne!(alice_favorites[0]["user_id"], bob_favorites[0]["user_id"]);
}
