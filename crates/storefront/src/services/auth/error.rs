//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::session::StoreError;

/// Message used when the backend rejects a login without saying why.
pub const DEFAULT_INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Errors that can occur during a login attempt.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Backend rejected the credentials (any 4xx). Carries the backend's
    /// message when it sent one. Wrong password and unknown user are not
    /// distinguished.
    #[error("{}", .0.as_deref().unwrap_or(DEFAULT_INVALID_CREDENTIALS))]
    InvalidCredentials(Option<String>),

    /// The external provider failed before the exchange was attempted.
    #[error("external sign-in failed: {0}")]
    ExternalProvider(#[from] ProviderError),

    /// No usable answer from the backend (transport failure, 5xx, or a body
    /// that is not a login grant).
    #[error("network error: {0}")]
    Network(#[source] ApiError),

    /// Login succeeded but the token could not be persisted.
    #[error("could not save session: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Message from the backend's error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::InvalidCredentials(message) => message.as_deref(),
            Self::Network(err) => err.server_message(),
            Self::ExternalProvider(_) | Self::Store(_) => None,
        }
    }

    /// Classify a failed login call.
    pub(crate) fn from_api(err: ApiError) -> Self {
        if err.is_client_error() {
            Self::InvalidCredentials(err.server_message().map(ToOwned::to_owned))
        } else {
            Self::Network(err)
        }
    }
}

/// Errors from an external token provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The user dismissed the provider's sign-in.
    #[error("sign-in was cancelled")]
    Cancelled,

    /// No access token was supplied.
    #[error("no access token available")]
    MissingToken,

    /// The provider reported a failure.
    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_invalid_credentials() {
        for status in [400, 401, 403, 404, 422] {
            let err = AuthError::from_api(ApiError::Api {
                status,
                message: None,
            });
            assert!(matches!(err, AuthError::InvalidCredentials(None)), "{status}");
        }
    }

    #[test]
    fn test_server_errors_are_network_errors() {
        let err = AuthError::from_api(ApiError::Api {
            status: 502,
            message: Some("Bad gateway".to_string()),
        });
        assert!(matches!(err, AuthError::Network(_)));
        assert_eq!(err.server_message(), Some("Bad gateway"));

        let err = AuthError::from_api(ApiError::Parse("truncated".to_string()));
        assert!(matches!(err, AuthError::Network(_)));
    }

    #[test]
    fn test_invalid_credentials_display() {
        assert_eq!(
            AuthError::InvalidCredentials(Some("Invalid password".to_string())).to_string(),
            "Invalid password"
        );
        assert_eq!(
            AuthError::InvalidCredentials(None).to_string(),
            DEFAULT_INVALID_CREDENTIALS
        );
    }
}
