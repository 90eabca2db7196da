//! Cache types for content API responses.

use std::sync::Arc;

use stride_core::ProductDocument;

/// Cache key for catalog queries.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<ProductDocument>>),
    /// `None` records a slug the catalog does not have.
    Product(Option<Box<ProductDocument>>),
}
