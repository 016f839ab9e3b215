//! Business logic services for the storefront client.
//!
//! # Services
//!
//! - `auth` - Password and external (Google) login, logout

pub mod auth;
