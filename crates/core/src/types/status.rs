//! Product availability status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Availability label attached to a catalog product.
///
/// The content API stores the label as free text, so parsing is tolerant:
/// case, spaces, hyphens and underscores are ignored. Labels that match no
/// known status are kept verbatim in [`ProductStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductStatus {
    #[default]
    InStock,
    /// Few units left or a limited release.
    Limited,
    SoldOut,
    /// Newly added to the catalog.
    JustIn,
    Other(String),
}

impl ProductStatus {
    /// Whether the product can currently be bought.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::SoldOut)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InStock => "in_stock",
            Self::Limited => "limited",
            Self::SoldOut => "sold_out",
            Self::JustIn => "just_in",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_' | '!'))
            .flat_map(char::to_lowercase)
            .collect();

        Ok(match normalized.as_str() {
            "instock" | "available" => Self::InStock,
            "limited" | "limitededition" | "lowstock" => Self::Limited,
            "soldout" | "outofstock" => Self::SoldOut,
            "justin" | "new" => Self::JustIn,
            _ => Self::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for ProductStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<ProductStatus> for String {
    fn from(status: ProductStatus) -> Self {
        status.as_str().to_string()
    }
}
