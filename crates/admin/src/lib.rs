//! Bloom Admin client library.
//!
//! Order browsing for store administrators, built on the session and API
//! client from `bloom-storefront`.
//!
//! - [`orders`] - Order directory and detail reducer
//! - [`format`] - Currency and date rendering
//!
//! Listing orders requires a session token; the backend decides whether the
//! bearer may see every order.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod format;
pub mod orders;

pub use error::{DirectoryError, FailureKind, FormatError};
pub use format::DisplayFormat;
pub use orders::{LoadStatus, OrderDetailView, OrderDirectory, OrderRow, reduce_order};
