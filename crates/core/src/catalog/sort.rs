//! Listing sort order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CriteriaError;
use crate::product::Product;

/// How the listing is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Alphabetical by product name, ignoring case.
    #[default]
    Featured,
    /// Most recent first. The catalog carries no publish date, so price
    /// (highest first) stands in for recency.
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::Featured, Self::Newest, Self::PriceAsc, Self::PriceDesc];

    /// Wire name used in query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Newest => "newest",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    /// Human label for the sort dropdown.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::Newest => "Newest",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
        }
    }

    /// Stable in-place sort of `products`.
    pub fn sort(&self, products: &mut [Product]) {
        match self {
            Self::Featured => products.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            }),
            Self::Newest | Self::PriceDesc => {
                products.sort_by(|a, b| b.price.amount().cmp(&a.price.amount()));
            }
            Self::PriceAsc => products.sort_by(|a, b| a.price.amount().cmp(&b.price.amount())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| CriteriaError::InvalidParam {
                param: "sort",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::catalog;

    #[test]
    fn test_parse_wire_names() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_serde_matches_wire_names() {
        let json = serde_json::to_string(&SortKey::PriceAsc).unwrap_or_default();
        assert_eq!(json, "\"price-asc\"");
    }

    #[test]
    fn test_featured_ignores_case() {
        let mut products = catalog();
        products.truncate(3);
        let names = ["Zoom Fly", "adidas Samba", "Air Max"];
        for (product, name) in products.iter_mut().zip(names) {
            product.name = name.to_string();
        }

        SortKey::Featured.sort(&mut products);
        let sorted: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(sorted, ["adidas Samba", "Air Max", "Zoom Fly"]);
    }

    #[test]
    fn test_newest_uses_price_descending() {
        let mut by_newest = catalog();
        let mut by_price = catalog();
        SortKey::Newest.sort(&mut by_newest);
        SortKey::PriceDesc.sort(&mut by_price);
        assert_eq!(by_newest, by_price);
    }
}
