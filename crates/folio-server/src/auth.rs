use std::sync::Arc;

use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use folio_core::TokenKind;

use crate::dto::ErrorResponse;
use crate::state::AppState;

/// Middleware that resolves `Authorization: Bearer <access_token>` into an
/// `Identity` and stores it in the request extensions.
///
/// Handlers behind this layer read the identity with `Extension<Identity>`
/// and run it through the authorization gate themselves; this layer only
/// answers "who is calling", never "may they".
pub async fn require_identity(
    State(state): State<Arc<AppState>>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let identity = match bearer {
        Some(token) => state
            .tokens
            .verify_identity(&state.credentials, token, TokenKind::Access),
        None => {
            return unauthorized("Missing Authorization header. Expected: Bearer <access_token>");
        }
    };

    match identity {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(detail) => {
            tracing::debug!("token rejected: {detail}");
            unauthorized("Missing, invalid, or expired bearer token")
        }
    }
}

fn unauthorized(message: &str) -> Response {
    let body = ErrorResponse {
        error: "unauthorized".to_string(),
        message: message.to_string(),
    };
    (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}
