//! Order records as listed by the admin orders endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::catalog::Product;
use super::id::OrderId;
use super::lenient;
use super::status::OrderStatus;

/// A placed order.
///
/// `status` keeps the raw backend string so unknown values can still be
/// shown; use [`Order::status`] for the classified form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "orderId", default, deserialize_with = "lenient::id")]
    pub order_id: OrderId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: String,
    #[serde(default, deserialize_with = "order_date")]
    pub date: Option<OrderDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total: Option<Decimal>,
    #[serde(
        rename = "labelledTotal",
        default,
        deserialize_with = "lenient::amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub labelled_total: Option<Decimal>,
    /// Line items. `None` when the backend did not send an array.
    #[serde(default, deserialize_with = "lenient::list")]
    pub products: Option<Vec<LineItem>>,
}

impl Order {
    /// Classified lifecycle status, `None` for missing or unknown values.
    #[must_use]
    pub fn status(&self) -> Option<OrderStatus> {
        OrderStatus::classify(&self.status)
    }

    /// Number of line items, zero when the products list is absent.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.products.as_ref().map_or(0, Vec::len)
    }
}

/// One line of an order: a product snapshot and a quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Snapshot of the product at order time; absent when malformed.
    #[serde(rename = "productInfo", default, deserialize_with = "lenient::object")]
    pub product_info: Option<Product>,
    #[serde(default, deserialize_with = "lenient::quantity")]
    pub quantity: u32,
}

/// Order placement date exactly as the backend sent it.
///
/// Parsing is deferred to display time so an unparsable value can still be
/// reported rather than rejected at decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderDate {
    /// ISO-like text, e.g. `2024-03-05T10:15:00.000Z`.
    Text(String),
    /// Milliseconds since the Unix epoch.
    Millis(i64),
}

fn order_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<OrderDate>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let date = match value {
        Value::String(text) => Some(OrderDate::Text(text)),
        Value::Number(number) => number.as_i64().map(OrderDate::Millis),
        _ => None,
    };
    Ok(date)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_order_with_line_items() {
        let order: Order = serde_json::from_value(json!({
            "orderId": "ORD0001",
            "name": "Nimali Perera",
            "email": "nimali@example.com",
            "phone": "0771234567",
            "address": "12 Galle Rd, Colombo",
            "date": "2024-03-05T10:15:00.000Z",
            "status": "shipped",
            "total": 750,
            "labelledTotal": 900,
            "products": [
                {"productInfo": {"productId": "P1", "name": "Soap", "price": 250}, "quantity": 3}
            ]
        }))
        .unwrap();

        assert_eq!(order.order_id.as_str(), "ORD0001");
        assert_eq!(order.status(), Some(OrderStatus::Shipped));
        assert_eq!(
            order.date,
            Some(OrderDate::Text("2024-03-05T10:15:00.000Z".to_string()))
        );
        assert_eq!(order.line_count(), 1);
        let line = &order.products.as_ref().unwrap()[0];
        assert_eq!(line.quantity, 3);
        assert_eq!(line.product_info.as_ref().unwrap().name, "Soap");
    }

    #[test]
    fn test_decode_repairs_malformed_fields() {
        let order: Order = serde_json::from_value(json!({
            "orderId": 42,
            "date": 1_709_633_700_000_i64,
            "status": null,
            "total": "not a number",
            "products": [
                {"productInfo": "gone", "quantity": 2},
                {"quantity": "x"},
                7
            ]
        }))
        .unwrap();

        assert_eq!(order.order_id.as_str(), "42");
        assert_eq!(order.date, Some(OrderDate::Millis(1_709_633_700_000)));
        assert_eq!(order.status(), None);
        assert_eq!(order.total, None);

        let lines = order.products.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_info, None);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].quantity, 0);
    }

    #[test]
    fn test_products_not_an_array_is_absent() {
        let order: Order = serde_json::from_value(json!({"products": {"a": 1}})).unwrap();
        assert_eq!(order.products, None);
        assert_eq!(order.line_count(), 0);

        let order: Order = serde_json::from_value(json!({})).unwrap();
        assert_eq!(order.products, None);
        assert_eq!(order.date, None);
    }
}
