use tokio::sync::RwLock;

use folio_core::{CredentialStore, Library, TokenService};

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
///
/// The book collection sits behind a single reader-writer lock: concurrent
/// reads proceed in parallel, mutations serialize. Guards are never held
/// across I/O.
pub struct AppState {
    pub library: RwLock<Library>,
    pub credentials: CredentialStore,
    pub tokens: TokenService,
}
