//! Request and response bodies for the backend API.

use bloom_core::lenient;
use bloom_core::{Product, Role, SessionToken};
use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Body of `POST /api/users/login`.
pub struct PasswordLogin<'a> {
    pub email: &'a str,
    pub password: &'a SecretString,
}

impl Serialize for PasswordLogin<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("PasswordLogin", 2)?;
        body.serialize_field("email", self.email)?;
        body.serialize_field("password", self.password.expose_secret())?;
        body.end()
    }
}

/// Body of `POST /api/users/login/google`.
pub struct ExternalLogin<'a> {
    pub access_token: &'a SecretString,
}

impl Serialize for ExternalLogin<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("ExternalLogin", 1)?;
        body.serialize_field("accessToken", self.access_token.expose_secret())?;
        body.end()
    }
}

/// Successful login response: a session token and the role it grants.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginGrant {
    pub token: SessionToken,
    #[serde(default, deserialize_with = "lenient::text")]
    pub role: String,
}

impl LoginGrant {
    /// Role granted by this login.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::from_grant(&self.role)
    }
}

/// Failure body shared by every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract a non-empty `message` from a raw response body.
    #[must_use]
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Normalize a search response into a product list.
///
/// The endpoint answers either with a bare array or with an object wrapping
/// the array under `products`. Any other shape yields no products.
#[must_use]
pub fn normalize_search_payload(payload: Value) -> Vec<Product> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut wrapper) => match wrapper.remove("products") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    lenient::decode_items(items)
}
