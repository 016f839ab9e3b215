//! Bloom Storefront client library.
//!
//! This crate holds the client-side session and data layer of the storefront:
//!
//! - [`config`] - Environment configuration
//! - [`api`] - HTTP client and the backend traits components depend on
//! - [`session`] - Credential stores and the injected [`Session`]
//! - [`services::auth`] - Password and external login
//! - [`search`] - Catalog search with stale-response suppression
//! - [`notify`] - User-visible notices
//!
//! Rendering is left to the caller; components expose plain view state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod notify;
pub mod search;
pub mod services;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use config::{ClientConfig, ConfigError};
pub use notify::{Notice, NoticeLevel, NoticeLog, Notifier};
pub use search::SearchEngine;
pub use services::auth::{Authenticator, LoginOutcome, Routes};
pub use session::{CredentialStore, FileCredentialStore, MemoryCredentialStore, Session};
