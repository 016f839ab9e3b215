//! Backend seams.
//!
//! Each component depends only on the trait for the endpoints it uses.
//! [`ApiClient`] implements all of them over HTTP; tests substitute fakes.
//!
//! The returned futures are not required to be `Send`, so implementations can
//! run on a single-threaded runtime or in the browser.

use std::future::Future;

use bloom_core::{Order, Product, SessionToken, lenient};
use secrecy::SecretString;
use serde_json::Value;

use super::{ApiClient, ApiError, ExternalLogin, LoginGrant, PasswordLogin, normalize_search_payload};

/// Login endpoints.
pub trait AuthBackend {
    /// Exchange an email and password for a session.
    fn login_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<LoginGrant, ApiError>>;

    /// Exchange an external provider's access token for a session.
    fn login_with_external_token(
        &self,
        access_token: &SecretString,
    ) -> impl Future<Output = Result<LoginGrant, ApiError>>;
}

/// Catalog search endpoint.
pub trait CatalogBackend {
    /// Look up products matching `query`. The query is sent as given.
    fn search_products(&self, query: &str) -> impl Future<Output = Result<Vec<Product>, ApiError>>;
}

/// Order listing endpoint.
pub trait OrderBackend {
    /// List the orders visible to the bearer of `token`.
    fn list_orders(
        &self,
        token: &SessionToken,
    ) -> impl Future<Output = Result<Vec<Order>, ApiError>>;
}

impl AuthBackend for ApiClient {
    #[tracing::instrument(skip(self, password))]
    async fn login_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginGrant, ApiError> {
        let url = self.endpoint(&["api", "users", "login"])?;
        self.post(url, &PasswordLogin { email, password }).await
    }

    #[tracing::instrument(skip_all)]
    async fn login_with_external_token(
        &self,
        access_token: &SecretString,
    ) -> Result<LoginGrant, ApiError> {
        let url = self.endpoint(&["api", "users", "login", "google"])?;
        self.post(url, &ExternalLogin { access_token }).await
    }
}

impl CatalogBackend for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(&["api", "products", "search", query])?;
        let payload: Value = self.get(url, None).await?;
        Ok(normalize_search_payload(payload))
    }
}

impl OrderBackend for ApiClient {
    #[tracing::instrument(skip_all)]
    async fn list_orders(&self, token: &SessionToken) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint(&["api", "orders"])?;
        let payload: Value = self.get(url, Some(token)).await?;
        match payload {
            Value::Array(items) => Ok(lenient::decode_items(items)),
            other => Err(ApiError::Parse(format!(
                "expected an array of orders, got {}",
                json_kind(&other)
            ))),
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
