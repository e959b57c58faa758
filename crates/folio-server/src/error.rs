use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use folio_core::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self.0 {
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            // The four verification failure modes all collapse to one 401;
            // the distinction stays in the logs.
            AppError::Token(detail) => {
                tracing::debug!("token rejected: {detail}");
                (StatusCode::UNAUTHORIZED, "unauthorized")
            }
            AppError::InsufficientRole { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        };

        let message = match &self.0 {
            // Do not echo verification details to the caller.
            AppError::Token(_) => "Missing, invalid, or expired bearer token".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}
