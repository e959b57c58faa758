use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CredentialStore;
use crate::error::{AppError, TokenError};
use crate::models::Identity;

/// Which of the two token classes a credential belongs to.
///
/// Both kinds are signed by the same secret with the same claim shape; the
/// kind lives inside the signed payload and the verifier always checks it,
/// so a refresh token can never pass where an access token is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Signed JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was minted for.
    pub sub: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    /// Random per-token id, so two tokens minted within the same second
    /// are still distinct credentials.
    pub jti: Uuid,
}

/// Issues and verifies the HS256 tokens for the API.
///
/// The symmetric secret is fixed at startup and never rotated while the
/// process runs; a restart invalidates nothing (tokens are stateless) but a
/// secret change invalidates everything. There is no revocation list.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: TimeDelta, refresh_ttl: TimeDelta) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Demo defaults: 60 second access tokens, 7 day refresh tokens.
    pub fn with_default_ttls(secret: &str) -> Self {
        Self::new(secret, TimeDelta::seconds(60), TimeDelta::days(7))
    }

    /// Mint a signed token of the given kind for `subject`, expiring at
    /// now + the kind's TTL.
    pub fn issue(&self, subject: &str, kind: TokenKind) -> Result<String, AppError> {
        self.issue_at(subject, kind, Utc::now())
    }

    /// Mint with an explicit clock. Expiry tests use this to produce
    /// already-expired tokens without sleeping.
    pub fn issue_at(
        &self,
        subject: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: subject.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::ConfigError(format!("token encoding failed: {e}")))
    }

    /// Validate signature, shape, expiry, and kind. Returns the decoded
    /// claims; does not touch the credential store.
    pub fn verify(&self, raw: &str, expected_kind: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry must hold exactly; the default 60s leeway would keep a
        // 1-minute access token alive for twice its TTL.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(raw, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        // The library's expiry check is exclusive (`exp < now`); a token is
        // already invalid at the exact expiry second, so check inclusively.
        if Utc::now().timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        if data.claims.kind != expected_kind {
            return Err(TokenError::Malformed(format!(
                "expected {} token, got {}",
                expected_kind.as_str(),
                data.claims.kind.as_str()
            )));
        }

        Ok(data.claims)
    }

    /// Full verification: claims check plus subject resolution against the
    /// credential store. A subject that no longer exists is rejected even
    /// when the token itself is pristine.
    pub fn verify_identity(
        &self,
        store: &CredentialStore,
        raw: &str,
        expected_kind: TokenKind,
    ) -> Result<Identity, TokenError> {
        let claims = self.verify(raw, expected_kind)?;
        store
            .resolve(&claims.sub)
            .ok_or(TokenError::UnknownSubject)
    }
}
