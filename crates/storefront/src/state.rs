//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CatalogError, CatalogSource, FileCatalog, SanityClient};
use crate::config::{CatalogConfig, StorefrontConfig};
use crate::shoppers::ShopperRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog source, visitor stores, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogSource>,
    shoppers: ShopperRegistry,
}

impl AppState {
    /// Create application state, building the catalog source from config.
    ///
    /// # Errors
    ///
    /// Returns an error if a file catalog is configured and cannot be read.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog: Arc<dyn CatalogSource> = match &config.catalog {
            CatalogConfig::Sanity(sanity) => Arc::new(SanityClient::new(sanity)),
            CatalogConfig::File(path) => Arc::new(FileCatalog::from_path(path)?),
        };
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create application state over an existing catalog source.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Arc<dyn CatalogSource>) -> Self {
        let shoppers = ShopperRegistry::new(&config.data_dir);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                shoppers,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog source.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogSource {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the visitor store registry.
    #[must_use]
    pub fn shoppers(&self) -> &ShopperRegistry {
        &self.inner.shoppers
    }
}
