use std::sync::{Arc, Mutex, PoisonError};

use bloom_core::SessionToken;

use super::{CredentialStore, StoreError};

/// In-memory credential store for tests and one-shot tools.
///
/// Clones share the same slot, so a test can keep a handle to inspect what
/// a [`Session`](super::Session) persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialStore {
    token: Arc<Mutex<Option<SessionToken>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    #[must_use]
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, token: &SessionToken) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn read(&self) -> Option<SessionToken> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}
