//! CLI command implementations.
//!
//! # Environment Variables
//!
//! See `bloom_storefront::config` for the full list. `BLOOM_BACKEND_URL` is
//! required by every command.

pub mod auth;
pub mod orders;
mod output;
pub mod search;

use std::sync::Arc;

use bloom_admin::{DirectoryError, FormatError};
use bloom_storefront::api::ApiError;
use bloom_storefront::services::auth::AuthError;
use bloom_storefront::session::StoreError;
use bloom_storefront::{ApiClient, ClientConfig, ConfigError, FileCredentialStore, NoticeLog, Session};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("login failed: {0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Directory(#[from] DirectoryError),

    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("no order with id {0}")]
    OrderNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a command needs: configuration, the API client, the session
/// persisted on disk and a notice log to print from.
pub struct Context {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub session: Session,
    pub notices: NoticeLog,
}

impl Context {
    /// Build the context from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if configuration is missing or invalid, or the
    /// HTTP client fails to build.
    pub fn from_env() -> Result<Self, CommandError> {
        let config = ClientConfig::from_env()?;
        let api = ApiClient::new(&config)?;
        let session = Session::init(FileCredentialStore::new(&config.credentials_path));

        Ok(Self {
            config,
            api,
            session,
            notices: NoticeLog::new(),
        })
    }

    /// The notice log as an injectable notifier.
    pub fn notifier(&self) -> Arc<NoticeLog> {
        Arc::new(self.notices.clone())
    }
}
