use std::sync::Arc;

use axum::Router;
use axum::extract::{Extension, Form, Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use folio_core::{AppError, Identity, Operation, TokenKind, authorize};

use crate::auth::require_identity;
use crate::dto::{
    BookCreate, BookResponse, BookUpdate, HealthResponse, RefreshRequest, SearchQuery,
    TokenRequest, TokenResponse,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let mutations = Router::new()
        .route("/books", post(create_book))
        .route("/books/{id}", put(update_book))
        .route("/books/{id}", delete(delete_book))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_identity,
        ));

    let public = Router::new()
        .route("/books", get(list_books))
        .route("/books/search", get(search_books))
        .route("/books/{id}", get(get_book))
        .route("/token", post(login))
        .route("/token/refresh", post(refresh))
        .route("/openapi.yaml", get(openapi_document))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(mutations).with_state(state)
}

// ---------------------------------------------------------------------------
// Books: reads
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "All books", body = [BookResponse]),
    ),
    tag = "books"
)]
pub async fn list_books(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let library = state.library.read().await;
    let books: Vec<BookResponse> = library.list().iter().map(BookResponse::from).collect();
    axum::Json(books)
}

#[utoipa::path(
    get,
    path = "/books/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books, paginated", body = [BookResponse]),
    ),
    tag = "books"
)]
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(2);

    let library = state.library.read().await;
    let books: Vec<BookResponse> = library
        .search(query.q.as_deref(), skip, limit)
        .iter()
        .map(BookResponse::from)
        .collect();

    axum::Json(books)
}

#[utoipa::path(
    get,
    path = "/books/{id}",
    params(
        ("id" = u64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    tag = "books"
)]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let library = state.library.read().await;
    let book = library.get(id)?;
    Ok(axum::Json(BookResponse::from(book)))
}

// ---------------------------------------------------------------------------
// Books: mutations (bearer access token + admin role)
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/books",
    request_body = BookCreate,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "books"
)]
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    axum::Json(body): axum::Json<BookCreate>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&identity, Operation::Create)?;

    let mut library = state.library.write().await;
    let book = library.create(&body.title, &body.author);
    tracing::info!(id = book.id, user = %identity.username, "book created");

    Ok((StatusCode::CREATED, axum::Json(BookResponse::from(book))))
}

#[utoipa::path(
    put,
    path = "/books/{id}",
    params(
        ("id" = u64, Path, description = "Book ID")
    ),
    request_body = BookUpdate,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::dto::ErrorResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "books"
)]
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<u64>,
    axum::Json(body): axum::Json<BookUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&identity, Operation::Update)?;

    let mut library = state.library.write().await;
    let book = library.update(id, &body.title, &body.author)?;

    Ok(axum::Json(BookResponse::from(book)))
}

#[utoipa::path(
    delete,
    path = "/books/{id}",
    params(
        ("id" = u64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::dto::ErrorResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "books"
)]
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&identity, Operation::Delete)?;

    let mut library = state.library.write().await;
    library.delete(id)?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access and refresh token pair", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = crate::dto::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(body): Form<TokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = state
        .credentials
        .authenticate(&body.username, &body.password)?;

    tracing::info!(user = %identity.username, "login");
    Ok(axum::Json(mint_pair(&state, &identity)?))
}

#[utoipa::path(
    post,
    path = "/token/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Fresh access and refresh token pair", body = TokenResponse),
        (status = 401, description = "Invalid refresh token", body = crate::dto::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = state
        .tokens
        .verify_identity(&state.credentials, &body.refresh_token, TokenKind::Refresh)
        .map_err(AppError::Token)?;

    tracing::debug!(user = %identity.username, "token refreshed");
    Ok(axum::Json(mint_pair(&state, &identity)?))
}

/// Mint a new access+refresh pair for an authenticated identity.
fn mint_pair(state: &AppState, identity: &Identity) -> Result<TokenResponse, AppError> {
    let access_token = state.tokens.issue(&identity.username, TokenKind::Access)?;
    let refresh_token = state.tokens.issue(&identity.username, TokenKind::Refresh)?;

    Ok(TokenResponse {
        access_token,
        token_type: "bearer",
        refresh_token,
    })
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// The generated API description document, served as JSON at the path the
/// original curriculum used for its handwritten YAML.
#[utoipa::path(
    get,
    path = "/openapi.yaml",
    responses(
        (status = 200, description = "OpenAPI document"),
    ),
    tag = "system"
)]
pub async fn openapi_document() -> impl IntoResponse {
    axum::Json(ApiDoc::openapi())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let books = state.library.read().await.list().len();

    axum::Json(HealthResponse {
        status: "healthy",
        books,
    })
}
