use std::collections::HashMap;

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::AppError;
use crate::models::{Identity, Role, User};

/// Static username → account mapping, fixed at startup.
///
/// There is no user CRUD: accounts exist only through `seeded` or the
/// builder used by tests. Password hashes are Argon2id PHC strings and
/// never leave this module.
#[derive(Debug)]
pub struct CredentialStore {
    users: HashMap<String, User>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
        }
    }

    /// The two demo accounts: `admin` may mutate the collection, `reader`
    /// may only read.
    pub fn seeded() -> Result<Self, AppError> {
        let mut store = Self::new();
        store.insert("admin", "admin-password", Role::Admin)?;
        store.insert("reader", "reader-password", Role::User)?;
        Ok(store)
    }

    /// Hash the plaintext and add the account. Seed-time only.
    pub fn insert(&mut self, username: &str, password: &str, role: Role) -> Result<(), AppError> {
        let password_hash = hash_password(password)?;
        self.users.insert(
            username.to_string(),
            User {
                username: username.to_string(),
                password_hash,
                role,
            },
        );
        Ok(())
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames and wrong passwords both fail with
    /// `InvalidCredentials`; the caller cannot tell which. Pure lookup,
    /// no side effects.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AppError> {
        let user = self
            .users
            .get(username)
            .ok_or(AppError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| AppError::ConfigError(format!("stored hash unparseable: {e}")))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::InvalidCredentials)?;

        Ok(Identity {
            username: user.username.clone(),
            role: user.role,
        })
    }

    /// Resolve a token subject to its current identity, if the account
    /// still exists.
    pub fn resolve(&self, username: &str) -> Option<Identity> {
        self.users.get(username).map(|user| Identity {
            username: user.username.clone(),
            role: user.role,
        })
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a plaintext password with Argon2id and a fresh random salt.
fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::ConfigError(format!("password hashing failed: {e}")))
}
