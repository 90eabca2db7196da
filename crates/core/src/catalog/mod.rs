//! Listing engine: filter, sort and describe a product collection.
//!
//! Everything here is pure. The storefront fetches the full collection once,
//! then recomputes the listing from it on every criteria change:
//!
//! ```text
//! products --filter(criteria)--> subset --sort(key)--> ordered --paginate--> page
//! ```

mod criteria;
mod query;
mod sort;

pub use criteria::{CriteriaError, FilterCriteria, PriceRange};
pub use query::ListingQuery;
pub use sort::SortKey;

use crate::product::Product;

/// Filter `products` by `criteria`, then order the survivors by `sort`.
///
/// Ties keep their input order.
#[must_use]
pub fn apply(products: &[Product], criteria: &FilterCriteria, sort: SortKey) -> Vec<Product> {
    let mut listing: Vec<Product> = products
        .iter()
        .filter(|product| criteria.matches(product))
        .cloned()
        .collect();
    sort.sort(&mut listing);
    listing
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{Price, ProductId, ProductStatus, Slug};

    pub fn product(name: &str, category: &str, price: i64, colors: &[&str]) -> Product {
        let slug = name.to_lowercase().replace(' ', "-");
        Product {
            id: ProductId::new(format!("id-{slug}")),
            name: name.to_string(),
            category: category.to_string(),
            price: Price::in_default_currency(Decimal::new(price, 0)).unwrap(),
            inventory: 10,
            colors: colors.iter().map(|c| (*c).to_string()).collect(),
            status: ProductStatus::InStock,
            image_url: format!("https://cdn.example.com/{slug}.png"),
            description: None,
            slug: Slug::new(slug),
        }
    }

    pub fn catalog() -> Vec<Product> {
        vec![
            product("Pegasus Trail", "Men's Shoes", 9995, &["Black", "Green"]),
            product("Dri-FIT Tee", "Men's T-Shirts", 1795, &["White"]),
            product("Air Max Dawn", "Women's Shoes", 8695, &["White", "Red"]),
            product("Club Tee", "Women's T-Shirts", 1495, &["Blue"]),
            product("Blazer Mid", "Women's Shoes", 8695, &["White"]),
        ]
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_default_criteria_keeps_everything() {
        let listing = apply(&catalog(), &FilterCriteria::default(), SortKey::Featured);
        assert_eq!(listing.len(), 5);
    }

    #[test]
    fn test_featured_sorts_by_name() {
        let listing = apply(&catalog(), &FilterCriteria::default(), SortKey::Featured);
        assert_eq!(
            names(&listing),
            vec![
                "Air Max Dawn",
                "Blazer Mid",
                "Club Tee",
                "Dri-FIT Tee",
                "Pegasus Trail"
            ]
        );
    }

    #[test]
    fn test_price_sorts_keep_input_order_on_ties() {
        let asc = apply(&catalog(), &FilterCriteria::default(), SortKey::PriceAsc);
        assert_eq!(
            names(&asc),
            vec![
                "Club Tee",
                "Dri-FIT Tee",
                "Air Max Dawn",
                "Blazer Mid",
                "Pegasus Trail"
            ]
        );

        let desc = apply(&catalog(), &FilterCriteria::default(), SortKey::PriceDesc);
        assert_eq!(
            names(&desc),
            vec![
                "Pegasus Trail",
                "Air Max Dawn",
                "Blazer Mid",
                "Dri-FIT Tee",
                "Club Tee"
            ]
        );
    }

    #[test]
    fn test_category_and_price_filter() {
        let criteria = FilterCriteria {
            categories: ["Women's Shoes".to_string()].into_iter().collect(),
            price_range: PriceRange::new(Decimal::ZERO, Some(Decimal::new(9000, 0))).unwrap(),
            ..FilterCriteria::default()
        };
        let listing = apply(&catalog(), &criteria, SortKey::Featured);
        assert_eq!(names(&listing), vec!["Air Max Dawn", "Blazer Mid"]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let criteria = FilterCriteria {
            query: "tee".to_string(),
            ..FilterCriteria::default()
        };
        let once = apply(&catalog(), &criteria, SortKey::PriceDesc);
        let twice = apply(&once, &criteria, SortKey::PriceDesc);
        assert_eq!(once, twice);
        assert_eq!(once, apply(&catalog(), &criteria, SortKey::PriceDesc));
    }

    #[test]
    fn test_empty_catalog() {
        assert!(apply(&[], &FilterCriteria::default(), SortKey::Newest).is_empty());
    }
}
