use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use tokio::sync::RwLock;
use tower::ServiceExt;

use folio_core::{CredentialStore, Library, TokenService};
use folio_server::routes;
use folio_server::state::AppState;

pub const TEST_SECRET: &str = "test-signing-secret";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

/// Build the app against the seeded demo data: six books, `admin` and
/// `reader` accounts.
pub fn setup_test_app() -> TestApp {
    let state = Arc::new(AppState {
        library: RwLock::new(Library::seeded()),
        credentials: CredentialStore::seeded().expect("seed credentials"),
        tokens: TokenService::with_default_ttls(TEST_SECRET),
    });

    TestApp {
        router: routes::router(state.clone()),
        state,
    }
}

/// POST /token with form-encoded credentials and return the parsed body.
pub async fn login(router: &Router, username: &str, password: &str) -> serde_json::Value {
    let response = router
        .clone()
        .oneshot(
            Request::post("/token")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={username}&password={password}"
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

/// Log in as the seeded admin and return a bearer access token.
pub async fn admin_token(router: &Router) -> String {
    let body = login(router, "admin", "admin-password").await;
    body["access_token"].as_str().unwrap().to_string()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
