//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BIJOUX_MONGODB_URL` - MongoDB connection string. Absent means the
//!   file backend is used without any connection attempt. Falls back to the
//!   generic `MONGODB_URL` if the prefixed variable is unset.
//! - `BIJOUX_HOST` - Bind address (default: 127.0.0.1)
//! - `BIJOUX_PORT` - Listen port (default: 4000)
//! - `BIJOUX_DATA_DIR` - Directory for the file backend's JSON trees
//!   (default: `data`)
//! - `BIJOUX_UPLOADS_DIR` - Directory for uploaded product images
//!   (default: `uploads`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// MongoDB connection string (contains credentials). `None` selects the
    /// file backend without attempting a connection.
    pub mongodb_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the file backend's JSON trees
    pub data_dir: PathBuf,
    /// Directory holding uploaded product images
    pub uploads_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable. A
    /// missing MongoDB URL is not an error - it selects the file backend.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mongodb_url = get_mongodb_url();
        let host = get_env_or_default("BIJOUX_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BIJOUX_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BIJOUX_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BIJOUX_PORT".to_string(), e.to_string()))?;
        let data_dir = PathBuf::from(get_env_or_default("BIJOUX_DATA_DIR", "data"));
        let uploads_dir = PathBuf::from(get_env_or_default("BIJOUX_UPLOADS_DIR", "uploads"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            mongodb_url,
            host,
            port,
            data_dir,
            uploads_dir,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get the MongoDB URL with fallback to the generic `MONGODB_URL`.
fn get_mongodb_url() -> Option<SecretString> {
    std::env::var("BIJOUX_MONGODB_URL")
        .or_else(|_| std::env::var("MONGODB_URL"))
        .ok()
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
