//! Type-safe price representation using decimal arithmetic.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PriceRepr")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    amount: Decimal,
    /// ISO 4217 currency code.
    currency_code: CurrencyCode,
}

#[derive(Deserialize)]
struct PriceRepr {
    amount: Decimal,
    #[serde(default)]
    currency_code: CurrencyCode,
}

impl TryFrom<PriceRepr> for Price {
    type Error = PriceError;

    fn try_from(repr: PriceRepr) -> Result<Self, Self::Error> {
        Self::new(repr.amount, repr.currency_code)
    }
}

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// Create a price in the default catalog currency.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn in_default_currency(amount: Decimal) -> Result<Self, PriceError> {
        Self::new(amount, CurrencyCode::default())
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    /// Price of `quantity` units. Saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self
                .amount
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
            currency_code: self.currency_code,
        }
    }

    /// Add another amount, keeping this price's currency. Saturates at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self {
            amount: self
                .amount
                .checked_add(other.amount)
                .unwrap_or(Decimal::MAX),
            currency_code: self.currency_code,
        }
    }

    /// Format for display (e.g., "₹4999.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes the catalog is priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
}

impl CurrencyCode {
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "₹",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        let result = Price::in_default_currency(Decimal::new(-1, 0));
        assert_eq!(result, Err(PriceError::Negative(Decimal::new(-1, 0))));
    }

    #[test]
    fn test_zero_price_allowed() {
        assert!(Price::in_default_currency(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_times_and_plus() {
        let price = Price::in_default_currency(Decimal::new(1250, 2)).unwrap();
        let doubled = price.times(2);
        assert_eq!(doubled.amount(), Decimal::new(25, 0));
        assert_eq!(doubled.plus(&price).amount(), Decimal::new(3750, 2));
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let huge = Price::in_default_currency(Decimal::MAX / Decimal::TWO).unwrap();
        assert_eq!(huge.times(3).amount(), Decimal::MAX);
        assert_eq!(huge.plus(&huge).plus(&huge).amount(), Decimal::MAX);
        assert_eq!(huge.times(0).amount(), Decimal::ZERO);
    }

    #[test]
    fn test_display_uses_currency_symbol() {
        let price = Price::new(Decimal::new(4999, 0), CurrencyCode::INR).unwrap();
        assert_eq!(price.display(), "₹4999.00");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let json = r#"{"amount":"-5","currency_code":"INR"}"#;
        assert!(serde_json::from_str::<Price>(json).is_err());
    }

    #[test]
    fn test_deserialize_defaults_currency() {
        let price: Price = serde_json::from_str(r#"{"amount":"10"}"#).unwrap();
        assert_eq!(price.currency_code(), CurrencyCode::INR);
    }
}
