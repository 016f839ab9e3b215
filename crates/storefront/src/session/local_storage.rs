use bloom_core::SessionToken;

use super::{CredentialStore, StoreError};

/// Key the browser client has always stored the token under.
const TOKEN_KEY: &str = "token";

/// Browser `localStorage` credential store.
///
/// The storage handle is looked up on every call rather than held, which
/// keeps the store `Send + Sync` on `wasm32`.
#[derive(Clone, Debug)]
pub struct LocalStorageCredentialStore {
    key: String,
}

impl Default for LocalStorageCredentialStore {
    fn default() -> Self {
        Self::new(TOKEN_KEY)
    }
}

impl LocalStorageCredentialStore {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|_| StoreError::Unavailable("localStorage access denied".to_string()))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }
}

impl CredentialStore for LocalStorageCredentialStore {
    fn save(&self, token: &SessionToken) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(&self.key, token.expose())
            .map_err(|_| StoreError::Unavailable("localStorage quota exceeded".to_string()))
    }

    fn read(&self) -> Option<SessionToken> {
        let storage = Self::storage()
            .inspect_err(|e| tracing::warn!(error = %e, "cannot read session token"))
            .ok()?;
        storage
            .get_item(&self.key)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
            .map(SessionToken::new)
    }

    fn clear(&self) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(&self.key)
            .map_err(|_| StoreError::Unavailable("localStorage write failed".to_string()))
    }
}
