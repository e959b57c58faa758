use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeDelta, Utc};
use tower::ServiceExt;

use folio_core::TokenKind;

use crate::common::{admin_token, body_json, login, setup_test_app};

// ---------------------------------------------------------------------------
// Public reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["books"], 6);
}

#[tokio::test]
async fn listing_books_needs_no_token() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(Request::get("/books").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 6);
    assert_eq!(json[0]["id"], 1);
    assert_eq!(json[0]["title"], "Vo chong A Phu");
}

#[tokio::test]
async fn get_book_by_id() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(Request::get("/books/4").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["title"], "Chi Pheo");
    assert_eq!(json["author"], "Nam Cao");
}

#[tokio::test]
async fn get_missing_book_returns_404() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(Request::get("/books/99").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn search_paginates_in_original_order() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(
            Request::get("/books/search?skip=1&limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let books = json.as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["id"], 2);
    assert_eq!(books[1]["id"], 3);
}

#[tokio::test]
async fn search_filters_title_and_author() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(
            Request::get("/books/search?q=nam%20cao&limit=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    let books = json.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Chi Pheo");
}

#[tokio::test]
async fn search_defaults_to_two_results() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(Request::get("/books/search").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Token issuance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_returns_bearer_pair() {
    let app = setup_test_app();

    let json = login(&app.router, "admin", "admin-password").await;
    assert_eq!(json["token_type"], "bearer");
    assert!(json["access_token"].as_str().unwrap().contains('.'));
    assert!(json["refresh_token"].as_str().unwrap().contains('.'));
    assert_ne!(json["access_token"], json["refresh_token"]);
}

#[tokio::test]
async fn wrong_password_returns_401() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(
            Request::post("/token")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from("username=admin&password=nope"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid_credentials");
}

#[tokio::test]
async fn refresh_yields_independently_valid_access_token() {
    let app = setup_test_app();

    let pair = login(&app.router, "admin", "admin-password").await;
    let refresh_token = pair["refresh_token"].as_str().unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/token/refresh")
                .header("content-type", "application/json")
                .body(Body::from(format!(
                    "{{\"refresh_token\":\"{refresh_token}\"}}"
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fresh = body_json(response).await;
    let access = fresh["access_token"].as_str().unwrap();

    // The refreshed access token must work on a guarded route by itself.
    let response = app
        .router
        .oneshot(
            Request::post("/books")
                .header("authorization", format!("Bearer {access}"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title":"X","author":"Y"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn access_token_cannot_be_used_to_refresh() {
    let app = setup_test_app();

    let pair = login(&app.router, "admin", "admin-password").await;
    let access_token = pair["access_token"].as_str().unwrap();

    let response = app
        .router
        .oneshot(
            Request::post("/token/refresh")
                .header("content-type", "application/json")
                .body(Body::from(format!(
                    "{{\"refresh_token\":\"{access_token}\"}}"
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Guarded mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mutation_without_token_returns_401() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(
            Request::post("/books")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title":"X","author":"Y"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn forged_token_returns_401() {
    let app = setup_test_app();

    let forged = folio_core::TokenService::with_default_ttls("attacker-secret")
        .issue("admin", TokenKind::Access)
        .unwrap();

    let response = app
        .router
        .oneshot(
            Request::delete("/books/1")
                .header("authorization", format!("Bearer {forged}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_returns_401() {
    let app = setup_test_app();

    let issued = Utc::now() - TimeDelta::seconds(120);
    let expired = app
        .state
        .tokens
        .issue_at("admin", TokenKind::Access, issued)
        .unwrap();

    let response = app
        .router
        .oneshot(
            Request::delete("/books/1")
                .header("authorization", format!("Bearer {expired}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reader_role_cannot_mutate() {
    let app = setup_test_app();

    let pair = login(&app.router, "reader", "reader-password").await;
    let token = pair["access_token"].as_str().unwrap();

    let response = app
        .router
        .oneshot(
            Request::post("/books")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title":"X","author":"Y"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn create_then_get_round_trip() {
    let app = setup_test_app();
    let token = admin_token(&app.router).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/books")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title":"X","author":"Y"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["id"], 7);

    let response = app
        .router
        .oneshot(Request::get("/books/7").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["title"], "X");
    assert_eq!(fetched["author"], "Y");
}

#[tokio::test]
async fn update_replaces_title_and_author() {
    let app = setup_test_app();
    let token = admin_token(&app.router).await;

    let response = app
        .router
        .oneshot(
            Request::put("/books/2")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title":"New","author":"Author"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], 2);
    assert_eq!(json["title"], "New");
}

#[tokio::test]
async fn update_missing_book_returns_404() {
    let app = setup_test_app();
    let token = admin_token(&app.router).await;

    let response = app
        .router
        .oneshot(
            Request::put("/books/99")
                .header("authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title":"T","author":"A"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_returns_404() {
    let app = setup_test_app();
    let token = admin_token(&app.router).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::delete("/books/3")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .router
        .oneshot(Request::get("/books/3").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// API description
// ---------------------------------------------------------------------------

#[tokio::test]
async fn openapi_document_is_served_as_json() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(Request::get("/openapi.yaml").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["openapi"].as_str().unwrap().starts_with('3'));
    assert!(json["paths"]["/books"].is_object());
    assert!(json["paths"]["/token/refresh"].is_object());
}
