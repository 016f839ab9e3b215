//! Error types for the admin client.

use bloom_storefront::ApiError;
use thiserror::Error;

/// Order directory errors.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No session token is held; the fetch was not attempted.
    #[error("not signed in")]
    Unauthenticated,

    /// The backend rejected the session token (401/403). The user must sign
    /// in again.
    #[error("session expired: {0}")]
    AuthorizationExpired(#[source] ApiError),

    /// The backend answered with something other than an order list.
    #[error("malformed response: {0}")]
    MalformedResponse(#[source] ApiError),

    /// Transport failure or any other non-success status.
    #[error("network error: {0}")]
    Network(#[source] ApiError),
}

impl DirectoryError {
    /// Classify a failed order fetch.
    pub(crate) fn from_api(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { .. } => Self::AuthorizationExpired(err),
            ApiError::Parse(_) => Self::MalformedResponse(err),
            ApiError::Http(_) | ApiError::Api { .. } => Self::Network(err),
        }
    }

    /// The payload-free kind of this error.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Unauthenticated => FailureKind::Unauthenticated,
            Self::AuthorizationExpired(_) => FailureKind::AuthorizationExpired,
            Self::MalformedResponse(_) => FailureKind::MalformedResponse,
            Self::Network(_) => FailureKind::Network,
        }
    }
}

/// Why the last order fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unauthenticated,
    AuthorizationExpired,
    MalformedResponse,
    Network,
}

impl FailureKind {
    /// Whether the user should be sent back to the login screen.
    #[must_use]
    pub const fn requires_login(self) -> bool {
        matches!(self, Self::Unauthenticated | Self::AuthorizationExpired)
    }
}

/// Display configuration errors.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid date format {0:?}")]
    InvalidDateFormat(String),
}
