use chrono::TimeDelta;

use folio_core::AppError;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub access_ttl: TimeDelta,
    pub refresh_ttl: TimeDelta,
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `FOLIO_JWT_SECRET` (required)
    /// - `FOLIO_PORT` (optional, defaults to 3000)
    /// - `FOLIO_ACCESS_TTL_SECS` (optional, defaults to 60)
    /// - `FOLIO_REFRESH_TTL_SECS` (optional, defaults to 7 days)
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = std::env::var("FOLIO_JWT_SECRET").map_err(|_| {
            AppError::ConfigError("FOLIO_JWT_SECRET not set. Required for token signing.".into())
        })?;

        let port = match std::env::var("FOLIO_PORT") {
            Err(_) => 3000,
            Ok(raw) => raw.parse().map_err(|_| {
                AppError::ConfigError(format!("Invalid FOLIO_PORT '{raw}': must be a port number"))
            })?,
        };

        let access_ttl = ttl_from_env("FOLIO_ACCESS_TTL_SECS", 60)?;
        let refresh_ttl = ttl_from_env("FOLIO_REFRESH_TTL_SECS", 7 * 24 * 60 * 60)?;

        Ok(Self {
            port,
            jwt_secret,
            access_ttl,
            refresh_ttl,
        })
    }
}

fn ttl_from_env(var: &str, default_secs: i64) -> Result<TimeDelta, AppError> {
    let secs = match std::env::var(var) {
        Err(_) => default_secs,
        Ok(raw) => {
            let parsed: i64 = raw.parse().map_err(|_| {
                AppError::ConfigError(format!("Invalid {var} '{raw}': must be a positive integer"))
            })?;
            if parsed <= 0 {
                return Err(AppError::ConfigError(format!("{var} must be at least 1")));
            }
            parsed
        }
    };
    Ok(TimeDelta::seconds(secs))
}
