//! Orders: the directory of visible orders and the detail reducer.
//!
//! # Components
//!
//! - `directory` - Fetches the order list and tracks the open order
//! - `detail` - Reduces one order into a fully-defaulted detail view
//! - `types` - View models shared by both

mod detail;
mod directory;
mod types;

pub use detail::{reduce_line, reduce_order};
pub use directory::{LoadStatus, OrderDirectory};
pub use types::*;
