//! Catalog product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::lenient;
use super::price::{CurrencyCode, Price};

/// A catalog product as returned by the search endpoint, or as the
/// point-in-time snapshot embedded in an order line.
///
/// Every field decodes leniently; a snapshot missing most of its fields is
/// still a valid `Product`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProductRecord")]
pub struct Product {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(rename = "altNames", skip_serializing_if = "Vec::is_empty")]
    pub alt_names: Vec<String>,
    pub description: String,
    pub images: Vec<String>,
    /// Selling price. `None` when the backend sent nothing usable.
    pub price: Option<Decimal>,
    /// Pre-discount reference price, shown struck through.
    #[serde(rename = "labelledPrice", skip_serializing_if = "Option::is_none")]
    pub labelled_price: Option<Decimal>,
}

/// Wire shape of a product.
///
/// Document-store records carry their storage key (`_id`) next to the
/// catalog id (`productId`); older snapshots only have `id`. Each key is its
/// own field so any combination decodes.
#[derive(Deserialize)]
struct ProductRecord {
    #[serde(rename = "productId", default, deserialize_with = "lenient::id")]
    product_id: ProductId,
    #[serde(default, deserialize_with = "lenient::id")]
    id: ProductId,
    #[serde(rename = "_id", default, deserialize_with = "lenient::id")]
    storage_id: ProductId,
    #[serde(default, deserialize_with = "lenient::text")]
    name: String,
    #[serde(rename = "altNames", default, deserialize_with = "lenient::strings")]
    alt_names: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    description: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    images: Vec<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    price: Option<Decimal>,
    #[serde(rename = "labelledPrice", default, deserialize_with = "lenient::amount")]
    labelled_price: Option<Decimal>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let product_id = [record.product_id, record.id, record.storage_id]
            .into_iter()
            .find(|id| !id.is_empty())
            .unwrap_or_default();

        Self {
            product_id,
            name: record.name,
            alt_names: record.alt_names,
            description: record.description,
            images: record.images,
            price: record.price,
            labelled_price: record.labelled_price,
        }
    }
}

impl Product {
    /// First image URL, if the product has any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Selling price with missing and negative amounts repaired to zero.
    #[must_use]
    pub fn price_or_zero(&self, currency_code: CurrencyCode) -> Price {
        Price::non_negative(self.price, currency_code)
    }

    /// Whether the product is shown with a struck-through reference price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        matches!((self.price, self.labelled_price), (Some(p), Some(l)) if l > p)
    }
}
