//! Session state and credential persistence.
//!
//! A [`CredentialStore`] durably holds a single bearer token and nothing
//! else. A [`Session`] wraps one store together with the in-memory role and
//! is the handle every component is given:
//!
//! - [`Session::init`] loads any token persisted by an earlier run.
//! - The authenticator is the only writer (`establish` on login, `end` on
//!   logout).
//! - Everything else reads through [`Session::token`], [`Session::role`] and
//!   [`Session::is_authenticated`].
//!
//! Only the token is persisted. A session restored from storage does not know
//! its role and reads as [`Role::Customer`] until the next login.

mod file;
mod memory;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageCredentialStore;

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use bloom_core::{Role, SessionToken};
use thiserror::Error;

/// Errors raised by a credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing storage is not available in this environment.
    #[error("credential storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for one session token.
///
/// Implementations do not inspect the token. An absent token is a normal
/// state meaning "signed out", so `read` has no error case.
pub trait CredentialStore: Send + Sync {
    /// Persist `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the token could not be written.
    fn save(&self, token: &SessionToken) -> Result<(), StoreError>;

    /// Read the persisted token, if any.
    fn read(&self) -> Option<SessionToken>;

    /// Remove the persisted token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if an existing token could not be removed.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Shared session handle.
///
/// Cheap to clone; clones observe the same state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Box<dyn CredentialStore>,
    state: RwLock<SessionState>,
}

#[derive(Default)]
struct SessionState {
    token: Option<SessionToken>,
    role: Option<Role>,
}

impl Session {
    /// Open a session over `store`, restoring any persisted token.
    pub fn init(store: impl CredentialStore + 'static) -> Self {
        let token = store.read();
        if token.is_some() {
            tracing::debug!("restored session token from credential store");
        }
        Self {
            inner: Arc::new(SessionInner {
                store: Box::new(store),
                state: RwLock::new(SessionState { token, role: None }),
            }),
        }
    }

    /// A session backed by process memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::init(MemoryCredentialStore::new())
    }

    /// Current bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<SessionToken> {
        self.read_state(|state| state.token.clone())
    }

    /// Current role. `Guest` when signed out; `Customer` when a token is held
    /// but its role is unknown.
    #[must_use]
    pub fn role(&self) -> Role {
        self.read_state(|state| match (&state.token, state.role) {
            (None, _) => Role::Guest,
            (Some(_), role) => role.unwrap_or(Role::Customer),
        })
    }

    /// Whether a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_state(|state| state.token.is_some())
    }

    /// Persist a freshly granted token and record its role.
    ///
    /// Nothing changes if the store rejects the write.
    pub(crate) fn establish(&self, token: SessionToken, role: Role) -> Result<(), StoreError> {
        self.inner.store.save(&token)?;
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        state.token = Some(token);
        state.role = Some(role);
        Ok(())
    }

    /// End the session because the backend rejected its token.
    ///
    /// Components that present the token (the order directory, for one)
    /// call this on a 401/403 so a dead token is not kept on disk.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the persisted token could not be removed. The
    /// in-memory session is reset regardless.
    pub fn expire(&self) -> Result<(), StoreError> {
        tracing::info!("session token rejected by backend; ending session");
        self.end()
    }

    /// Forget the session. The in-memory state is reset even if the store
    /// fails to remove the persisted token.
    pub(crate) fn end(&self) -> Result<(), StoreError> {
        let cleared = self.inner.store.clear();
        *self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = SessionState::default();
        cleared
    }

    fn read_state<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("role", &self.role())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Store that refuses every write.
    struct ReadOnlyStore;

    impl CredentialStore for ReadOnlyStore {
        fn save(&self, _token: &SessionToken) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }

        fn read(&self) -> Option<SessionToken> {
            None
        }

        fn clear(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_new_session_is_guest() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), Role::Guest);
        assert!(session.token().is_none());
    }

    #[test]
    fn test_establish_and_end() {
        let store = MemoryCredentialStore::new();
        let session = Session::init(store.clone());

        session
            .establish(SessionToken::new("T1"), Role::Admin)
            .unwrap();
        assert_eq!(session.token().unwrap().expose(), "T1");
        assert_eq!(session.role(), Role::Admin);
        assert_eq!(store.read().unwrap().expose(), "T1");

        session.end().unwrap();
        assert_eq!(session.role(), Role::Guest);
        assert!(store.read().is_none());
    }

    #[test]
    fn test_expire_clears_restored_token() {
        let store = MemoryCredentialStore::with_token(SessionToken::new("T9"));
        let session = Session::init(store.clone());
        let reader = session.clone();

        session.expire().unwrap();

        assert!(!reader.is_authenticated());
        assert_eq!(reader.role(), Role::Guest);
        assert!(store.read().is_none());
    }

    #[test]
    fn test_restored_token_reads_as_customer() {
        let store = MemoryCredentialStore::with_token(SessionToken::new("T9"));
        let session = Session::init(store);
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Role::Customer);
    }

    #[test]
    fn test_failed_save_leaves_session_untouched() {
        let session = Session::init(ReadOnlyStore);
        assert!(
            session
                .establish(SessionToken::new("T1"), Role::Admin)
                .is_err()
        );
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), Role::Guest);
    }

    #[test]
    fn test_end_resets_state_even_when_store_fails() {
        let session = Session::init(ReadOnlyStore);
        assert!(session.end().is_err());
        assert_eq!(session.role(), Role::Guest);
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::in_memory();
        let reader = session.clone();
        session
            .establish(SessionToken::new("T1"), Role::Customer)
            .unwrap();
        assert!(reader.is_authenticated());
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::in_memory();
        session
            .establish(SessionToken::new("secret-token"), Role::Customer)
            .unwrap();
        let debug_output = format!("{session:?}");
        assert!(!debug_output.contains("secret-token"));
        assert!(debug_output.contains("Customer"));
    }
}
