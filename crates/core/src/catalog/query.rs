//! Listing state mirrored into the page's query string.
//!
//! Selected filters, sort and page live in the URL so a filtered view can be
//! bookmarked or shared:
//!
//! ```text
//! /products?category=Men's+Shoes,Women's+Shoes&color=Red&minPrice=0&maxPrice=15000&sort=price-asc&page=2
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::{CriteriaError, FilterCriteria, PriceRange, SortKey};

/// Query parameters of the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    /// Comma-separated category names.
    pub category: Option<String>,
    /// Comma-separated color names.
    pub color: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Free-text search over name and category.
    pub q: Option<String>,
    pub sort: Option<SortKey>,
    /// 1-based page number.
    pub page: Option<usize>,
}

fn split_list(value: Option<&str>) -> impl Iterator<Item = String> + '_ {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn parse_param<T: FromStr>(param: &'static str, value: &str) -> Result<T, CriteriaError> {
    value
        .trim()
        .parse()
        .map_err(|_| CriteriaError::InvalidParam {
            param,
            value: value.to_string(),
        })
}

impl ListingQuery {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// Unknown parameters are ignored. Empty values count as absent.
    ///
    /// # Errors
    ///
    /// Returns `CriteriaError::InvalidParam` for unparseable prices, sort keys
    /// or page numbers.
    pub fn from_query_string(query: &str) -> Result<Self, CriteriaError> {
        let mut listing = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.trim().is_empty() {
                continue;
            }
            match key.as_ref() {
                "category" => listing.category = Some(value.into_owned()),
                "color" => listing.color = Some(value.into_owned()),
                "minPrice" => listing.min_price = Some(parse_param("minPrice", &value)?),
                "maxPrice" => listing.max_price = Some(parse_param("maxPrice", &value)?),
                "q" => listing.q = Some(value.into_owned()),
                "sort" => listing.sort = Some(value.parse()?),
                "page" => listing.page = Some(parse_param("page", &value)?),
                _ => {}
            }
        }

        Ok(listing)
    }

    /// Build the listing query describing `criteria`, `sort` and `page`.
    #[must_use]
    pub fn from_criteria(criteria: &FilterCriteria, sort: SortKey, page: usize) -> Self {
        let join = |set: &std::collections::BTreeSet<String>| {
            (!set.is_empty()).then(|| set.iter().cloned().collect::<Vec<_>>().join(","))
        };
        let query = criteria.query.trim();

        Self {
            category: join(&criteria.categories),
            color: join(&criteria.colors),
            min_price: (!criteria.price_range.min().is_zero())
                .then(|| criteria.price_range.min()),
            max_price: criteria.price_range.max(),
            q: (!query.is_empty()).then(|| query.to_string()),
            sort: (sort != SortKey::Featured).then_some(sort),
            page: (page > 1).then_some(page),
        }
    }

    /// Filter criteria selected by this query.
    ///
    /// # Errors
    ///
    /// Returns `CriteriaError::InvertedPriceRange` if `minPrice > maxPrice`.
    pub fn criteria(&self) -> Result<FilterCriteria, CriteriaError> {
        Ok(FilterCriteria {
            categories: split_list(self.category.as_deref()).collect(),
            colors: split_list(self.color.as_deref()).collect(),
            price_range: PriceRange::new(self.min_price.unwrap_or(Decimal::ZERO), self.max_price)?,
            query: self.q.as_deref().unwrap_or_default().trim().to_string(),
        })
    }

    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        self.sort.unwrap_or_default()
    }

    /// Requested page, treating absent and zero as the first page.
    #[must_use]
    pub fn page_number(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Serialize back to a query string, omitting empty parameters.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(category) = non_empty(&self.category) {
            serializer.append_pair("category", &category);
        }
        if let Some(color) = non_empty(&self.color) {
            serializer.append_pair("color", &color);
        }
        if let Some(min) = self.min_price {
            serializer.append_pair("minPrice", &min.to_string());
        }
        if let Some(max) = self.max_price {
            serializer.append_pair("maxPrice", &max.to_string());
        }
        if let Some(q) = non_empty(&self.q) {
            serializer.append_pair("q", &q);
        }
        if let Some(sort) = self.sort {
            serializer.append_pair("sort", sort.as_str());
        }
        if let Some(page) = self.page {
            serializer.append_pair("page", &page.to_string());
        }

        serializer.finish()
    }

    /// The same query pointed at another page.
    #[must_use]
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_query() {
        let query = ListingQuery::from_query_string(
            "category=Men%27s+Shoes,Women%27s+Shoes&color=Red&minPrice=100&maxPrice=15000&q=air&sort=price-asc&page=2",
        )
        .unwrap();

        let criteria = query.criteria().unwrap();
        assert_eq!(criteria.categories.len(), 2);
        assert!(criteria.categories.contains("Men's Shoes"));
        assert!(criteria.colors.contains("Red"));
        assert_eq!(criteria.price_range.min(), Decimal::new(100, 0));
        assert_eq!(criteria.price_range.max(), Some(Decimal::new(15000, 0)));
        assert_eq!(criteria.query, "air");
        assert_eq!(query.sort_key(), SortKey::PriceAsc);
        assert_eq!(query.page_number(), 2);
    }

    #[test]
    fn test_empty_query_is_default_listing() {
        let query = ListingQuery::from_query_string("").unwrap();
        assert_eq!(query, ListingQuery::default());
        assert_eq!(query.criteria().unwrap(), FilterCriteria::default());
        assert_eq!(query.page_number(), 1);
        assert_eq!(query.sort_key(), SortKey::Featured);
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(ListingQuery::from_query_string("minPrice=cheap").is_err());
        assert!(ListingQuery::from_query_string("sort=random").is_err());
        assert!(ListingQuery::from_query_string("page=-1").is_err());
    }

    #[test]
    fn test_inverted_prices_rejected_by_criteria() {
        let query = ListingQuery::from_query_string("minPrice=500&maxPrice=100").unwrap();
        assert!(matches!(
            query.criteria(),
            Err(CriteriaError::InvertedPriceRange { .. })
        ));
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let query = ListingQuery::from_query_string("page=0").unwrap();
        assert_eq!(query.page_number(), 1);
    }

    #[test]
    fn test_to_query_string_omits_empty_filters() {
        let query = ListingQuery {
            color: Some(String::new()),
            q: Some("  ".to_string()),
            sort: Some(SortKey::PriceDesc),
            ..ListingQuery::default()
        };
        assert_eq!(query.to_query_string(), "sort=price-desc");
    }

    #[test]
    fn test_criteria_survive_query_string() {
        let criteria = FilterCriteria {
            categories: ["Men's Shoes".to_string(), "Women's Shoes".to_string()]
                .into_iter()
                .collect(),
            colors: ["Black".to_string()].into_iter().collect(),
            price_range: PriceRange::new(Decimal::new(50, 0), Some(Decimal::new(9000, 0))).unwrap(),
            query: "pegasus".to_string(),
        };

        let query = ListingQuery::from_criteria(&criteria, SortKey::Newest, 3);
        let parsed = ListingQuery::from_query_string(&query.to_query_string()).unwrap();

        assert_eq!(parsed.criteria().unwrap(), criteria);
        assert_eq!(parsed.sort_key(), SortKey::Newest);
        assert_eq!(parsed.page_number(), 3);
    }

    #[test]
    fn test_with_page_keeps_filters() {
        let query = ListingQuery::from_query_string("color=Blue&page=1").unwrap();
        let next = query.with_page(2);
        assert_eq!(next.color.as_deref(), Some("Blue"));
        assert_eq!(next.to_query_string(), "color=Blue&page=2");
    }
}
