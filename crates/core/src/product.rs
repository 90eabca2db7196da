//! Catalog products.
//!
//! [`ProductDocument`] is the record exactly as the content API projects it,
//! with every field optional because editors can publish incomplete
//! documents. [`Product`] is the validated form the rest of the storefront
//! works with; converting rejects documents that are missing anything a cart
//! line or wishlist entry needs to render.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, PriceError, ProductId, ProductStatus, Slug};

/// Errors validating a catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("product is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("product has an invalid price: {0}")]
    InvalidPrice(#[from] PriceError),
}

/// A product record as returned by the catalog query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub inventory: Option<u32>,
    pub colors: Option<Vec<String>>,
    pub status: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
}

/// A validated catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub inventory: u32,
    pub colors: Vec<String>,
    pub status: ProductStatus,
    pub image_url: String,
    pub description: Option<String>,
    pub slug: Slug,
}

impl Product {
    /// Whether any of the product's color variants equals `color`, ignoring case.
    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c.eq_ignore_ascii_case(color))
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ProductError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ProductError::MissingField(field))
}

impl TryFrom<ProductDocument> for Product {
    type Error = ProductError;

    fn try_from(doc: ProductDocument) -> Result<Self, Self::Error> {
        let id = required(doc.id, "_id")?;
        let name = required(doc.product_name, "productName")?;
        let amount = doc.price.ok_or(ProductError::MissingField("price"))?;
        let image_url = required(doc.image_url, "imageUrl")?;
        let slug = required(doc.slug, "slug")?;

        Ok(Self {
            id: ProductId::new(id),
            name,
            category: doc.category.unwrap_or_default(),
            price: Price::in_default_currency(amount)?,
            inventory: doc.inventory.unwrap_or(0),
            colors: doc.colors.unwrap_or_default(),
            status: doc.status.map(ProductStatus::from).unwrap_or_default(),
            image_url,
            description: doc.description.filter(|d| !d.trim().is_empty()),
            slug: Slug::new(slug),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete_document() -> ProductDocument {
        ProductDocument {
            id: Some("prod-1".to_string()),
            product_name: Some("Air Zoom Pegasus".to_string()),
            category: Some("Men's Shoes".to_string()),
            price: Some(Decimal::new(10795, 0)),
            inventory: Some(12),
            colors: Some(vec!["Black".to_string(), "White".to_string()]),
            status: Some("Just In!".to_string()),
            image_url: Some("https://cdn.sanity.io/images/pegasus.png".to_string()),
            description: Some("Responsive cushioning.".to_string()),
            slug: Some("air-zoom-pegasus".to_string()),
        }
    }

    #[test]
    fn test_deserialize_catalog_record() {
        let json = r#"{
            "_id": "prod-1",
            "productName": "Air Zoom Pegasus",
            "category": "Men's Shoes",
            "price": 10795,
            "inventory": 12,
            "colors": ["Black"],
            "status": "Just In!",
            "imageUrl": "https://cdn.sanity.io/images/pegasus.png",
            "description": null,
            "slug": "air-zoom-pegasus"
        }"#;
        let doc: ProductDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id.as_deref(), Some("prod-1"));
        assert_eq!(doc.price, Some(Decimal::new(10795, 0)));
        assert!(doc.description.is_none());
    }

    #[test]
    fn test_valid_document_converts() {
        let product = Product::try_from(complete_document()).unwrap();
        assert_eq!(product.id.as_str(), "prod-1");
        assert_eq!(product.status, ProductStatus::JustIn);
        assert!(product.has_color("black"));
        assert!(!product.has_color("red"));
    }

    #[test]
    fn test_missing_name_rejected() {
        let doc = ProductDocument {
            product_name: None,
            ..complete_document()
        };
        assert_eq!(
            Product::try_from(doc),
            Err(ProductError::MissingField("productName"))
        );
    }

    #[test]
    fn test_blank_image_rejected() {
        let doc = ProductDocument {
            image_url: Some("  ".to_string()),
            ..complete_document()
        };
        assert_eq!(
            Product::try_from(doc),
            Err(ProductError::MissingField("imageUrl"))
        );
    }

    #[test]
    fn test_negative_price_rejected() {
        let doc = ProductDocument {
            price: Some(Decimal::new(-10, 0)),
            ..complete_document()
        };
        assert!(matches!(
            Product::try_from(doc),
            Err(ProductError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_optional_fields_default() {
        let doc = ProductDocument {
            category: None,
            inventory: None,
            colors: None,
            status: None,
            description: Some(String::new()),
            ..complete_document()
        };
        let product = Product::try_from(doc).unwrap();
        assert_eq!(product.category, "");
        assert_eq!(product.inventory, 0);
        assert!(product.colors.is_empty());
        assert_eq!(product.status, ProductStatus::InStock);
        assert!(product.description.is_none());
    }
}
