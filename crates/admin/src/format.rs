//! Display formatting for money and order dates.

use std::fmt::Write as _;

use bloom_core::{CurrencyCode, OrderDate, Price};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::error::FormatError;

/// Rendered in place of a date that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Default short date format (day/month/year).
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Offset-less timestamp layouts, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Currency and date settings for rendering admin views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFormat {
    currency: CurrencyCode,
    date_format: String,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::LKR,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl DisplayFormat {
    /// Create a display format.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidDateFormat` if `date_format` is not a
    /// valid `strftime` pattern.
    pub fn new(currency: CurrencyCode, date_format: impl Into<String>) -> Result<Self, FormatError> {
        let date_format = date_format.into();
        if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
            return Err(FormatError::InvalidDateFormat(date_format));
        }
        Ok(Self {
            currency,
            date_format,
        })
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Price in the display currency; missing and negative amounts are zero.
    #[must_use]
    pub fn price(&self, amount: Option<Decimal>) -> Price {
        Price::non_negative(amount, self.currency)
    }

    /// Render an amount as `LKR 1,234.50`.
    #[must_use]
    pub fn money(&self, amount: Option<Decimal>) -> String {
        self.price(amount).display()
    }

    /// Render an order date in the configured short format.
    ///
    /// Missing and unparsable dates render as [`INVALID_DATE`].
    #[must_use]
    pub fn date(&self, date: Option<&OrderDate>) -> String {
        let Some(parsed) = date.and_then(parse_order_date) else {
            return INVALID_DATE.to_string();
        };
        let mut out = String::new();
        if write!(out, "{}", parsed.format(&self.date_format)).is_err() {
            return INVALID_DATE.to_string();
        }
        out
    }
}

/// Parse an order date into a UTC instant.
///
/// Accepts RFC 3339, offset-less ISO timestamps (taken as UTC), plain
/// `YYYY-MM-DD`, and epoch milliseconds.
#[must_use]
pub fn parse_order_date(date: &OrderDate) -> Option<DateTime<Utc>> {
    match date {
        OrderDate::Millis(millis) => DateTime::from_timestamp_millis(*millis),
        OrderDate::Text(text) => parse_date_text(text.trim()),
    }
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
