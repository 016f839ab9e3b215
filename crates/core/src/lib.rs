//! Bloom Core - Shared types library.
//!
//! This crate provides common types used across all Bloom components:
//! - `storefront` - Session, authentication and catalog search
//! - `admin` - Order directory and order detail view models
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types and decoding helpers - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it to
//! be used anywhere, including `wasm32`.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, roles, statuses,
//!   session tokens and the catalog/order records returned by the backend

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
