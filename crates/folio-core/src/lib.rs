pub mod auth;
pub mod authz;
pub mod error;
pub mod models;
pub mod store;
pub mod token;

pub use auth::CredentialStore;
pub use authz::{Operation, authorize};
pub use error::{AppError, TokenError};
pub use models::{Book, Identity, Role};
pub use store::Library;
pub use token::{TokenKind, TokenService};
