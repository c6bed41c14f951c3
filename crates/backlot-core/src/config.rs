//! Environment-driven configuration
//!
//! Every setting has a default suitable for local development; production
//! deployments override via environment variables (see `.env.example`).

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HS256 secret for signing bearer tokens.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// When false, requests without credentials run as an anonymous staff
    /// principal. Router tests rely on this switch.
    pub require_authentication: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgres://localhost/backlot".into(),
                max_connections: 10,
                min_connections: 2,
                connect_timeout_secs: 30,
            },
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8080,
            },
            auth: AuthConfig {
                jwt_secret: "dev-secret-change-me".into(),
                token_ttl_secs: 24 * 60 * 60,
                require_authentication: true,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults above for anything unset.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        Ok(Self {
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", defaults.database.url),
                max_connections: parse_env("DB_MAX_CONNECTIONS", defaults.database.max_connections)?,
                min_connections: parse_env("DB_MIN_CONNECTIONS", defaults.database.min_connections)?,
                connect_timeout_secs: parse_env(
                    "DB_CONNECT_TIMEOUT",
                    defaults.database.connect_timeout_secs,
                )?,
            },
            server: ServerConfig {
                host: env_or("BACKLOT_HOST", defaults.server.host),
                port: parse_env("BACKLOT_PORT", defaults.server.port)?,
            },
            auth: AuthConfig {
                jwt_secret: env_or("BACKLOT_JWT_SECRET", defaults.auth.jwt_secret),
                token_ttl_secs: parse_env("BACKLOT_TOKEN_TTL_SECS", defaults.auth.token_ttl_secs)?,
                require_authentication: parse_env(
                    "BACKLOT_REQUIRE_AUTH",
                    defaults.auth.require_authentication,
                )?,
            },
        })
    }

    /// Socket address string for the HTTP listener.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("{}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_local_postgres() {
        let config = AppConfig::default();
        assert_eq!(config.server_addr(), "127.0.0.1:8080");
        assert!(config.database.url.starts_with("postgres://"));
        assert!(config.auth.require_authentication);
    }

    #[test]
    fn unparseable_numeric_env_is_a_config_error() {
        let err = parse_env::<u16>("__BACKLOT_BOGUS_PORT", 0).map(|_| ());
        assert!(err.is_ok()); // unset -> default

        std::env::set_var("__BACKLOT_BOGUS_PORT", "not-a-number");
        let err = parse_env::<u16>("__BACKLOT_BOGUS_PORT", 0);
        std::env::remove_var("__BACKLOT_BOGUS_PORT");
        assert!(matches!(err, Err(AppError::Config(_))));
    }
}
