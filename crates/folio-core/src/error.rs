use thiserror::Error;

/// Application-wide error types for folio.
///
/// Every variant is terminal: there is nothing transient to retry anywhere
/// in the system, so no retryability classification exists.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Bearer token failed verification.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Verified identity lacks the role required for the operation.
    #[error("role '{role}' may not perform '{operation}'")]
    InsufficientRole { role: String, operation: String },

    /// No book with the given id.
    #[error("book not found: {0}")]
    NotFound(u64),

    /// Invalid or missing configuration.
    #[error("config error: {0}")]
    ConfigError(String),
}

/// Token verification failures.
///
/// These must stay distinguishable internally (tests assert on them) even
/// though the HTTP boundary collapses all of them into a single 401.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Undecodable payload, missing claims, or wrong token kind.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Signature does not verify under the configured secret.
    #[error("bad token signature")]
    BadSignature,

    /// Current time is at or past the embedded expiry.
    #[error("token expired")]
    Expired,

    /// Signature and expiry are fine but the subject no longer resolves
    /// to a known user.
    #[error("unknown token subject")]
    UnknownSubject,
}
