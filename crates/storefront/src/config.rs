//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BLOOM_BACKEND_URL` - Base URL of the store backend (e.g., `http://localhost:5000`)
//!
//! ## Optional
//! - `BLOOM_CREDENTIALS_PATH` - Session token file (default: `.bloom/session-token`)
//! - `BLOOM_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `BLOOM_ADMIN_ROUTE` - Landing route after an admin login (default: `/admin`)
//! - `BLOOM_HOME_ROUTE` - Landing route after any other login (default: `/`)
//! - `BLOOM_DATE_FORMAT` - `strftime` pattern for order dates (default: `%d/%m/%Y`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::services::auth::Routes;

const DEFAULT_CREDENTIALS_PATH: &str = ".bloom/session-token";
const DEFAULT_TIMEOUT_SECS: &str = "30";
const DEFAULT_ADMIN_ROUTE: &str = "/admin";
const DEFAULT_HOME_ROUTE: &str = "/";
const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL
    pub backend_url: Url,
    /// Where the file credential store keeps the session token
    pub credentials_path: PathBuf,
    /// Transport timeout for every request
    pub http_timeout: Duration,
    /// Post-login destinations
    pub routes: Routes,
    /// `strftime` pattern used when rendering order dates
    pub date_format: String,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let backend_url = env.required("BLOOM_BACKEND_URL")?;
        let backend_url = Url::parse(&backend_url).map_err(|e| {
            ConfigError::InvalidEnvVar("BLOOM_BACKEND_URL".to_string(), e.to_string())
        })?;
        if backend_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "BLOOM_BACKEND_URL".to_string(),
                "must be an http(s) base URL".to_string(),
            ));
        }

        let credentials_path =
            PathBuf::from(env.or_default("BLOOM_CREDENTIALS_PATH", DEFAULT_CREDENTIALS_PATH));

        let http_timeout = env
            .or_default("BLOOM_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BLOOM_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })
            .map(Duration::from_secs)?;

        let routes = Routes {
            admin: env.or_default("BLOOM_ADMIN_ROUTE", DEFAULT_ADMIN_ROUTE),
            home: env.or_default("BLOOM_HOME_ROUTE", DEFAULT_HOME_ROUTE),
        };

        let date_format = env.or_default("BLOOM_DATE_FORMAT", DEFAULT_DATE_FORMAT);

        Ok(Self {
            backend_url,
            credentials_path,
            http_timeout,
            routes,
            date_format,
        })
    }

    /// Configuration pointing at `backend_url` with every optional value
    /// at its default.
    #[must_use]
    pub fn for_backend(backend_url: Url) -> Self {
        Self {
            backend_url,
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            http_timeout: Duration::from_secs(30),
            routes: Routes::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required variable. Blank values count as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}
