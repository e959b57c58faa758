use serde::{Deserialize, Serialize};

use folio_core::Book;

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BookResponse {
    pub id: u64,
    pub title: String,
    pub author: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
        }
    }
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
        }
    }
}

/// Body for `POST /books`. The id is assigned by the server.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BookCreate {
    pub title: String,
    pub author: String,
}

/// Body for `PUT /books/{id}`: full replace of title and author.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BookUpdate {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against title and author.
    pub q: Option<String>,
    /// Number of leading results to drop.
    pub skip: Option<usize>,
    /// Maximum number of results to return.
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Form body for `POST /token`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub books: usize,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
