//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts coming from the backend are JSON numbers and may be missing, not
//! numeric, or negative. A [`Price`] built through [`Price::non_negative`]
//! repairs all of those to zero, so display code never has to branch on them.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A non-negative price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (rupees, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Build a price from a possibly-missing amount.
    ///
    /// Missing and negative amounts become zero.
    #[must_use]
    pub fn non_negative(amount: Option<Decimal>, currency_code: CurrencyCode) -> Self {
        let amount = amount
            .filter(|value| !value.is_sign_negative() || value.is_zero())
            .unwrap_or(Decimal::ZERO);
        Self::new(amount, currency_code)
    }

    /// Multiply by a line quantity.
    ///
    /// Saturates at [`Decimal::MAX`] instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        let amount = self
            .amount
            .checked_mul(Decimal::from(quantity))
            .unwrap_or(Decimal::MAX);
        Self::new(amount, self.currency_code)
    }

    /// Amount rounded to two decimal places, half away from zero.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Plain two-decimal rendering without currency or grouping (e.g. `1234.50`).
    #[must_use]
    pub fn fixed(&self) -> String {
        format!("{:.2}", self.rounded())
    }

    /// Format for display (e.g. `LKR 1,234.50`).
    #[must_use]
    pub fn display(&self) -> String {
        let fixed = self.fixed();
        let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        format!(
            "{} {}.{fraction}",
            self.currency_code.code(),
            group_thousands(integer)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Insert `,` between every group of three integer digits.
fn group_thousands(integer: &str) -> String {
    let (sign, digits) = integer
        .strip_prefix('-')
        .map_or(("", integer), |rest| ("-", rest));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped}")
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Sri Lankan rupee, the store's currency.
    #[default]
    LKR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::LKR => "LKR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LKR" => Ok(Self::LKR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lkr(amount: &str) -> Price {
        Price::new(amount.parse().unwrap(), CurrencyCode::LKR)
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(lkr("1234.5").display(), "LKR 1,234.50");
        assert_eq!(lkr("1234567.891").display(), "LKR 1,234,567.89");
        assert_eq!(lkr("999").display(), "LKR 999.00");
        assert_eq!(lkr("0").display(), "LKR 0.00");
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(lkr("10.005").fixed(), "10.01");
        assert_eq!(lkr("10.004").fixed(), "10.00");
    }

    #[test]
    fn test_non_negative_repairs_missing_and_negative() {
        assert_eq!(
            Price::non_negative(None, CurrencyCode::LKR),
            Price::zero(CurrencyCode::LKR)
        );
        assert_eq!(
            Price::non_negative(Some(Decimal::new(-500, 2)), CurrencyCode::LKR),
            Price::zero(CurrencyCode::LKR)
        );
        assert_eq!(
            Price::non_negative(Some(Decimal::new(25000, 2)), CurrencyCode::LKR).fixed(),
            "250.00"
        );
    }

    #[test]
    fn test_times_quantity() {
        assert_eq!(lkr("250.00").times(3).fixed(), "750.00");
        assert_eq!(lkr("250.00").times(0).fixed(), "0.00");
    }

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("lkr".parse::<CurrencyCode>().unwrap(), CurrencyCode::LKR);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
