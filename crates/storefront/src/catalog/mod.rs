//! Product catalog sources.
//!
//! # Architecture
//!
//! - The content API is the source of truth; the storefront never writes to it
//! - [`CatalogSource`] abstracts where records come from so handlers and tests
//!   do not depend on HTTP
//! - [`SanityClient`] queries a Sanity dataset with GROQ and caches responses
//!   via `moka` (5 minute TTL)
//! - [`FileCatalog`] serves records from a JSON file (local development and
//!   tests)
//!
//! Sources return raw [`ProductDocument`]s. Validation into [`Product`] happens
//! at the point of use so a single broken document cannot empty the listing.

mod cache;
mod file;
pub mod queries;
mod sanity;

pub use file::FileCatalog;
pub use sanity::SanityClient;

use async_trait::async_trait;
use thiserror::Error;

use stride_core::{Product, ProductDocument};

/// Errors that can occur when reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The content API answered with a non-success status.
    #[error("Catalog API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Local catalog file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rate limited by the content API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// A read-only collection of product records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every product document in the catalog.
    async fn products(&self) -> Result<Vec<ProductDocument>, CatalogError>;

    /// The product document with the given slug, if any.
    async fn product_by_slug(&self, slug: &str) -> Result<Option<ProductDocument>, CatalogError>;
}

/// Fetch and validate the whole catalog.
///
/// A failed fetch is logged and yields an empty collection. Documents that
/// fail validation are logged and skipped.
pub async fn load_products(source: &dyn CatalogSource) -> Vec<Product> {
    match source.products().await {
        Ok(documents) => validate_documents(documents),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products");
            Vec::new()
        }
    }
}

fn validate_documents(documents: Vec<ProductDocument>) -> Vec<Product> {
    documents
        .into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            Product::try_from(doc)
                .inspect_err(|e| {
                    tracing::warn!(product_id = ?id, error = %e, "Skipping invalid product document");
                })
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    struct UnreachableCatalog;

    #[async_trait]
    impl CatalogSource for UnreachableCatalog {
        async fn products(&self) -> Result<Vec<ProductDocument>, CatalogError> {
            Err(CatalogError::RateLimited(30))
        }

        async fn product_by_slug(
            &self,
            _slug: &str,
        ) -> Result<Option<ProductDocument>, CatalogError> {
            Err(CatalogError::RateLimited(30))
        }
    }

    fn document(id: &str, name: Option<&str>) -> ProductDocument {
        ProductDocument {
            id: Some(id.to_string()),
            product_name: name.map(str::to_string),
            price: Some(Decimal::new(100, 0)),
            image_url: Some(format!("https://cdn.example.com/{id}.png")),
            slug: Some(id.to_string()),
            ..ProductDocument::default()
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_yields_empty_collection() {
        assert!(load_products(&UnreachableCatalog).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_documents_are_skipped() {
        let catalog = FileCatalog::new(vec![
            document("a", Some("Valid")),
            document("b", None),
        ]);
        let products = load_products(&catalog).await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Valid");
    }
}
