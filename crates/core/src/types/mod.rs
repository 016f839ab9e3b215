//! Core types for Bloom.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! records the backend returns.

pub mod catalog;
pub mod credential;
pub mod email;
pub mod id;
pub mod lenient;
pub mod order;
pub mod price;
pub mod status;

pub use catalog::Product;
pub use credential::SessionToken;
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{LineItem, Order, OrderDate};
pub use price::{CurrencyCode, Price};
pub use status::*;
