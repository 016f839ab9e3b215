//! External identity providers.
//!
//! An external login is two stages: obtain an access token from the provider,
//! then exchange it with the backend. This module covers the first stage.

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};

use super::ProviderError;

/// Source of an external (Google) access token.
pub trait ExternalTokenProvider {
    /// Run the provider's sign-in and return its access token.
    fn access_token(&self) -> impl Future<Output = Result<SecretString, ProviderError>>;
}

/// Provider for a token obtained out of band, e.g. passed on the command line.
pub struct StaticTokenProvider {
    token: Option<SecretString>,
}

impl StaticTokenProvider {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::from_option(Some(token.into()))
    }

    /// A provider that may have nothing to offer. Blank tokens count as none.
    #[must_use]
    pub fn from_option(token: Option<String>) -> Self {
        Self {
            token: token
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
        }
    }
}

impl ExternalTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<SecretString, ProviderError> {
        self.token
            .as_ref()
            .map(|token| SecretString::from(token.expose_secret().to_owned()))
            .ok_or(ProviderError::MissingToken)
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
