//! # File-backed credential store
//!
//! [`FileCredentialStore`] keeps the session token in a single file so a CLI
//! session survives between invocations.
//!
//! ## Layout
//!
//! ```text
//! <path>            # token bytes, no trailing newline
//! <path>.tmp        # transient, only while a save is in progress
//! ```
//!
//! Saves write the sibling temporary file and rename it over `<path>`, so a
//! crash mid-write never leaves a truncated token behind.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bloom_core::SessionToken;

use super::{CredentialStore, StoreError};

/// Filesystem-backed credential store.
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("session-token"), ToOwned::to_owned);
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, token: &SessionToken) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path();
        std::fs::write(&temp, token.expose()).map_err(|e| self.io_error(e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&temp);
            self.io_error(e)
        })
    }

    fn read(&self) -> Option<SessionToken> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                if token.is_empty() {
                    tracing::warn!(path = %self.path.display(), "credential file is empty");
                    return None;
                }
                Some(SessionToken::new(token))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "credential file unreadable; treating session as signed out"
                );
                None
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
