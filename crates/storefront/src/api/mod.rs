//! HTTP client for the store backend.
//!
//! The backend is treated as a black box returning JSON records. This module
//! owns the transport: URL construction, bearer authorization, status
//! classification and error-body extraction. Everything above it talks to the
//! backend through the traits in [`backend`], so components can be tested
//! against in-memory fakes.
//!
//! # Endpoints
//!
//! - `POST /api/users/login` - password login
//! - `POST /api/users/login/google` - external (Google) token exchange
//! - `GET /api/products/search/{query}` - catalog search
//! - `GET /api/orders` - orders visible to the bearer

pub mod backend;
mod types;

pub use backend::{AuthBackend, CatalogBackend, OrderBackend};
pub use types::*;

use std::sync::Arc;

use bloom_core::SessionToken;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (no response, timeout, connection refused).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the caller's credential (401/403).
    #[error("Unauthorized ({status}){}", display_message(.message.as_deref()))]
    Unauthorized {
        status: u16,
        message: Option<String>,
    },

    /// Backend returned any other non-success status.
    #[error("API error ({status}){}", display_message(.message.as_deref()))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// Request URL could not be built or response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

fn display_message(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ApiError {
    /// HTTP status of the response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }

    /// The `message` field of the error body, if the backend sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message, .. } | Self::Api { message, .. } => message.as_deref(),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }

    /// Whether the backend answered with a 4xx status.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| (400..500).contains(&status))
    }

    /// Whether the backend rejected the bearer credential.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Backend API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.http_timeout);
        let client = builder.build()?;

        Ok(Self::with_client(config.backend_url.clone(), client))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        }
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an endpoint URL by appending path segments to the base URL.
    ///
    /// Each segment is percent-encoded, so user input such as a search query
    /// can never introduce extra path components or a query string.
    ///
    /// URL path rules drop `.` and `..` segments (encoded or not), which would
    /// address a different endpoint, so they are refused instead.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(dots) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ApiError::Parse(format!(
                "path segment '{dots}' cannot be sent to the backend"
            )));
        }
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Parse("backend URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Execute a GET request, optionally with a bearer credential.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        token: Option<&SessionToken>,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.client.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse an error response from the backend.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = ErrorBody::message_from(&body);

        if status == 401 || status == 403 {
            return ApiError::Unauthorized { status, message };
        }

        ApiError::Api { status, message }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}
