//! View models for the orders screens.
//!
//! Every field is already defaulted and formatted; renderers never have to
//! handle missing data.

use bloom_core::OrderStatus;
use rust_decimal::Decimal;

// =============================================================================
// Status Badges
// =============================================================================

/// Presentation category of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Warning,
    Info,
    Transit,
    Success,
    Danger,
    Neutral,
}

impl StatusCategory {
    /// Badge category for a lifecycle status; unknown statuses are neutral.
    #[must_use]
    pub const fn for_status(status: Option<OrderStatus>) -> Self {
        match status {
            Some(OrderStatus::Pending) => Self::Warning,
            Some(OrderStatus::Processing) => Self::Info,
            Some(OrderStatus::Shipped) => Self::Transit,
            Some(OrderStatus::Completed) => Self::Success,
            Some(OrderStatus::Cancelled) => Self::Danger,
            None => Self::Neutral,
        }
    }

    /// Emphasis tone for the detail header: only pending and completed
    /// orders are not highlighted as a problem.
    #[must_use]
    pub const fn emphasis_for(status: Option<OrderStatus>) -> Self {
        match status {
            Some(OrderStatus::Pending) => Self::Warning,
            Some(OrderStatus::Completed) => Self::Success,
            _ => Self::Danger,
        }
    }
}

/// Status badge: upper-cased raw status and its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub category: StatusCategory,
}

impl StatusBadge {
    /// Badge for a raw backend status string.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        Self {
            label: raw.to_uppercase(),
            category: StatusCategory::for_status(OrderStatus::classify(raw)),
        }
    }
}

// =============================================================================
// Table View Types
// =============================================================================

/// One row of the orders table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub order_id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    /// Two-decimal total without currency (e.g. `750.00`).
    pub total: String,
    pub date: String,
    pub status: StatusBadge,
}

// =============================================================================
// Order Detail Views
// =============================================================================

/// Fully-defaulted detail view of one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetailView {
    pub order_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date: String,
    pub status: StatusBadge,
    /// Tone for the header's status emphasis.
    pub emphasis: StatusCategory,
    pub total: String,
    /// Pre-discount total, when the backend sent one. Never below `total`.
    pub labelled_total: Option<String>,
    /// Line items. `None` when the order carried no products list, in which
    /// case the products section is not shown at all.
    pub products: Option<Vec<LineItemView>>,
    /// Sum of the line subtotals.
    pub lines_total: String,
}

/// One line of the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemView {
    pub product_id: String,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
    /// Unrounded subtotal, for aggregation.
    pub subtotal_amount: Decimal,
}
