//! Filter criteria for the product listing.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::Product;

/// Errors building filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("minimum price {min} is greater than maximum price {max}")]
    InvertedPriceRange { min: Decimal, max: Decimal },
    #[error("invalid value for `{param}`: {value}")]
    InvalidParam { param: &'static str, value: String },
}

/// Inclusive price bounds. An absent maximum means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    min: Decimal,
    max: Option<Decimal>,
}

impl PriceRange {
    /// Build a range, rejecting `min > max`.
    ///
    /// # Errors
    ///
    /// Returns `CriteriaError::InvertedPriceRange` if the bounds are inverted.
    pub fn new(min: Decimal, max: Option<Decimal>) -> Result<Self, CriteriaError> {
        if let Some(max) = max
            && min > max
        {
            return Err(CriteriaError::InvertedPriceRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(&self) -> Decimal {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Option<Decimal> {
        self.max
    }

    #[must_use]
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min && self.max.is_none_or(|max| amount <= max)
    }

    /// Whether this range filters nothing out.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min <= Decimal::ZERO && self.max.is_none()
    }
}

/// What the shopper has narrowed the listing to.
///
/// Empty category or color sets mean "any". A blank query matches every
/// product.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub categories: BTreeSet<String>,
    pub colors: BTreeSet<String>,
    pub price_range: PriceRange,
    pub query: String,
}

impl FilterCriteria {
    /// Whether `product` passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_category(product)
            && self.matches_color(product)
            && self.price_range.contains(product.price.amount())
            && self.matches_query(product)
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.categories.is_empty() || self.categories.contains(&product.category)
    }

    fn matches_color(&self, product: &Product) -> bool {
        self.colors.is_empty() || self.colors.iter().any(|color| product.has_color(color))
    }

    fn matches_query(&self, product: &Product) -> bool {
        let needle = self.query.trim().to_lowercase();
        needle.is_empty()
            || product.name.to_lowercase().contains(&needle)
            || product.category.to_lowercase().contains(&needle)
    }
}
