//! Order detail reducer.
//!
//! Turns one raw [`Order`] into display values in a single pass. All repair
//! of partial data happens here: missing product snapshots become blank lines
//! with a zero price, missing amounts become zero, unknown statuses become a
//! neutral badge and unparsable dates render as "Invalid Date".

use bloom_core::{LineItem, Order};
use rust_decimal::Decimal;

use super::types::{LineItemView, OrderDetailView, OrderRow, StatusBadge, StatusCategory};
use crate::format::DisplayFormat;

/// Reduce an order into its detail view.
#[must_use]
pub fn reduce_order(order: &Order, format: &DisplayFormat) -> OrderDetailView {
    let status = order.status();
    let total = format.price(order.total);

    let labelled_total = order.labelled_total.map(|labelled| {
        let labelled = format.price(Some(labelled));
        if labelled.amount < total.amount {
            tracing::warn!(
                order_id = %order.order_id,
                "labelled total below total; showing total instead"
            );
            total.display()
        } else {
            labelled.display()
        }
    });

    let products = order
        .products
        .as_ref()
        .map(|lines| lines.iter().map(|line| reduce_line(line, format)).collect::<Vec<_>>());

    let lines_sum = products
        .iter()
        .flatten()
        .fold(Decimal::ZERO, |sum, line| {
            sum.checked_add(line.subtotal_amount).unwrap_or(Decimal::MAX)
        });

    OrderDetailView {
        order_id: order.order_id.to_string(),
        name: order.name.clone(),
        email: order.email.clone(),
        phone: order.phone.clone(),
        address: order.address.clone(),
        date: format.date(order.date.as_ref()),
        status: StatusBadge::from_raw(&order.status),
        emphasis: StatusCategory::emphasis_for(status),
        total: total.display(),
        labelled_total,
        products,
        lines_total: format.money(Some(lines_sum)),
    }
}

/// Reduce one order line. A missing product snapshot yields a blank line
/// priced at zero.
#[must_use]
pub fn reduce_line(line: &LineItem, format: &DisplayFormat) -> LineItemView {
    let Some(product) = &line.product_info else {
        let zero = format.price(None);
        return LineItemView {
            product_id: String::new(),
            name: String::new(),
            image: None,
            unit_price: zero.display(),
            quantity: line.quantity,
            subtotal: zero.display(),
            subtotal_amount: Decimal::ZERO,
        };
    };

    let unit = format.price(product.price);
    let subtotal = unit.times(line.quantity);

    LineItemView {
        product_id: product.product_id.to_string(),
        name: product.name.clone(),
        image: product.primary_image().map(ToOwned::to_owned),
        unit_price: unit.display(),
        quantity: line.quantity,
        subtotal: subtotal.display(),
        subtotal_amount: subtotal.amount,
    }
}

impl OrderRow {
    /// Table row for an order.
    #[must_use]
    pub fn from_order(order: &Order, format: &DisplayFormat) -> Self {
        Self {
            order_id: order.order_id.to_string(),
            name: order.name.clone(),
            email: order.email.clone(),
            address: order.address.clone(),
            phone: order.phone.clone(),
            total: format.price(order.total).fixed(),
            date: format.date(order.date.as_ref()),
            status: StatusBadge::from_raw(&order.status),
        }
    }
}
