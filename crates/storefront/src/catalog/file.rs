//! Catalog served from a local JSON file.
//!
//! The file holds an array of product records in the same shape the GROQ
//! projection returns, so a dataset export can be dropped in directly.

use std::path::Path;

use async_trait::async_trait;

use stride_core::ProductDocument;

use super::{CatalogError, CatalogSource};

/// In-memory catalog loaded once from disk (or built in code for tests).
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    documents: Vec<ProductDocument>,
}

impl FileCatalog {
    #[must_use]
    pub const fn new(documents: Vec<ProductDocument>) -> Self {
        Self { documents }
    }

    /// Read and parse the catalog file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of
    /// product records.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let documents: Vec<ProductDocument> = serde_json::from_str(&raw)?;
        tracing::info!(
            path = %path.as_ref().display(),
            count = documents.len(),
            "Loaded catalog file"
        );
        Ok(Self { documents })
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn products(&self) -> Result<Vec<ProductDocument>, CatalogError> {
        Ok(self.documents.clone())
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<ProductDocument>, CatalogError> {
        Ok(self
            .documents
            .iter()
            .find(|doc| doc.slug.as_deref() == Some(slug))
            .cloned())
    }
}
