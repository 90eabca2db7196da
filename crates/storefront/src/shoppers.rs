//! Per-visitor cart and wishlist stores.
//!
//! A visitor's stores are rehydrated from their storage directory the first
//! time a request touches them, then kept in memory until the visitor has
//! been idle for [`SHOPPER_IDLE_SECONDS`]. Every mutation writes through to
//! disk, so eviction never loses data.
//!
//! A visitor has at most one live [`ShopperHandle`] at a time. The idle cache
//! may drop its copy while a request still holds the handle; the next lookup
//! finds the live handle again instead of loading a second copy from disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use moka::sync::Cache;
use tokio::task::JoinError;
use uuid::Uuid;

use stride_core::{CartStore, WishlistStore};

use crate::storage::FileStorage;

/// How long an idle visitor's stores stay in memory.
pub const SHOPPER_IDLE_SECONDS: u64 = 30 * 60;

const MAX_RESIDENT_SHOPPERS: u64 = 10_000;

/// One visitor's cart and wishlist.
#[derive(Debug)]
pub struct Shopper {
    pub cart: CartStore<FileStorage>,
    pub wishlist: WishlistStore<FileStorage>,
}

impl Shopper {
    /// Rehydrate both stores from `storage`.
    #[must_use]
    pub fn load(storage: &FileStorage) -> Self {
        Self {
            cart: CartStore::load(storage.clone()),
            wishlist: WishlistStore::load(storage.clone()),
        }
    }
}

/// Shared handle to a visitor's stores.
#[derive(Debug, Clone)]
pub struct ShopperHandle(Arc<Mutex<Shopper>>);

impl ShopperHandle {
    /// Lock the stores for one request's worth of work.
    ///
    /// Poisoning is ignored: each store mutation is one in-memory step
    /// followed by a write.
    pub fn lock(&self) -> MutexGuard<'_, Shopper> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resident visitor stores keyed by visitor ID.
#[derive(Clone)]
pub struct ShopperRegistry {
    root: PathBuf,
    shoppers: Cache<Uuid, ShopperHandle>,
    live: Arc<Mutex<HashMap<Uuid, Weak<Mutex<Shopper>>>>>,
}

impl ShopperRegistry {
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_idle_timeout(root, Duration::from_secs(SHOPPER_IDLE_SECONDS))
    }

    #[must_use]
    pub fn with_idle_timeout(root: impl AsRef<Path>, idle: Duration) -> Self {
        let shoppers = Cache::builder()
            .max_capacity(MAX_RESIDENT_SHOPPERS)
            .time_to_idle(idle)
            .build();

        Self {
            root: root.as_ref().to_path_buf(),
            shoppers,
            live: Arc::default(),
        }
    }

    /// The stores for `visitor`, loading them on first access.
    pub fn get(&self, visitor: Uuid) -> ShopperHandle {
        if let Some(handle) = self.shoppers.get(&visitor) {
            return handle;
        }

        let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = match live.get(&visitor).and_then(Weak::upgrade) {
            Some(shopper) => ShopperHandle(shopper),
            None => {
                tracing::debug!(visitor = %visitor, "Rehydrating shopper stores");
                let storage = FileStorage::new(&self.root, &visitor.to_string());
                let handle = ShopperHandle(Arc::new(Mutex::new(Shopper::load(&storage))));
                live.retain(|_, shopper| shopper.strong_count() > 0);
                live.insert(visitor, Arc::downgrade(&handle.0));
                handle
            }
        };

        self.shoppers.insert(visitor, handle.clone());
        handle
    }

    /// Run `f` against `visitor`'s locked stores on the blocking pool.
    ///
    /// Store mutations write files synchronously, so they stay off the async
    /// workers.
    ///
    /// # Errors
    ///
    /// Returns an error if `f` panics.
    pub async fn with_shopper<T, F>(&self, visitor: Uuid, f: F) -> Result<T, JoinError>
    where
        F: FnOnce(&mut Shopper) -> T + Send + 'static,
        T: Send + 'static,
    {
        let registry = self.clone();
        tokio::task::spawn_blocking(move || {
            let handle = registry.get(visitor);
            let mut shopper = handle.lock();
            f(&mut *shopper)
        })
        .await
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use stride_core::{Price, Product, ProductId, ProductStatus, Slug};

    use super::*;

    fn product() -> Option<Product> {
        Some(Product {
            id: ProductId::new("tee"),
            name: "Club Tee".to_string(),
            category: "Women's T-Shirts".to_string(),
            price: Price::in_default_currency(Decimal::new(1495, 0)).ok()?,
            inventory: 3,
            colors: vec![],
            status: ProductStatus::InStock,
            image_url: "https://cdn.example.com/tee.png".to_string(),
            description: None,
            slug: Slug::new("club-tee"),
        })
    }

    #[test]
    fn test_same_visitor_shares_stores() {
        let root = std::env::temp_dir().join(format!("stride-shoppers-{}", Uuid::new_v4()));
        let registry = ShopperRegistry::new(&root);
        let visitor = Uuid::new_v4();
        let Some(tee) = product() else { return };

        registry.get(visitor).lock().cart.add_to_cart(&tee, Some("M"));
        assert_eq!(registry.get(visitor).lock().cart.item_count(), 1);
        assert_eq!(registry.get(Uuid::new_v4()).lock().cart.item_count(), 0);

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_stores_survive_eviction() {
        let root = std::env::temp_dir().join(format!("stride-shoppers-{}", Uuid::new_v4()));
        let visitor = Uuid::new_v4();
        let Some(tee) = product() else { return };

        {
            let registry = ShopperRegistry::new(&root);
            let handle = registry.get(visitor);
            let mut shopper = handle.lock();
            shopper.cart.add_to_cart(&tee, None);
            shopper.wishlist.add_to_wishlist(&tee);
        }

        let fresh = ShopperRegistry::new(&root);
        let handle = fresh.get(visitor);
        let shopper = handle.lock();
        assert_eq!(shopper.cart.item_count(), 1);
        assert!(shopper.wishlist.is_in_wishlist(&tee.id));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_held_handle_survives_cache_eviction() {
        let root = std::env::temp_dir().join(format!("stride-shoppers-{}", Uuid::new_v4()));
        let registry = ShopperRegistry::new(&root);
        let visitor = Uuid::new_v4();
        let Some(tee) = product() else { return };

        let held = registry.get(visitor);
        registry.shoppers.invalidate(&visitor);
        let again = registry.get(visitor);
        assert!(Arc::ptr_eq(&held.0, &again.0));

        held.lock().cart.add_to_cart(&tee, None);
        again.lock().cart.add_to_cart(&tee, None);
        assert_eq!(registry.get(visitor).lock().cart.item_count(), 2);

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_concurrent_adds_across_evictions_are_not_lost() {
        let root = std::env::temp_dir().join(format!("stride-shoppers-{}", Uuid::new_v4()));
        let registry = ShopperRegistry::new(&root);
        let visitor = Uuid::new_v4();
        let Some(tee) = product() else { return };

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..5 {
                        let handle = registry.get(visitor);
                        registry.shoppers.invalidate_all();
                        handle.lock().cart.add_to_cart(&tee, Some("M"));
                    }
                });
            }
        });

        assert_eq!(registry.get(visitor).lock().cart.item_count(), 40);
        let reloaded = ShopperRegistry::new(&root);
        assert_eq!(reloaded.get(visitor).lock().cart.item_count(), 40);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_with_shopper_runs_against_visitor_stores() {
        let root = std::env::temp_dir().join(format!("stride-shoppers-{}", Uuid::new_v4()));
        let registry = ShopperRegistry::new(&root);
        let visitor = Uuid::new_v4();
        let Some(tee) = product() else { return };

        let count = registry
            .with_shopper(visitor, move |shopper| {
                shopper.cart.add_to_cart(&tee, None);
                shopper.cart.item_count()
            })
            .await;
        assert_eq!(count.ok(), Some(1));
        assert_eq!(registry.get(visitor).lock().cart.item_count(), 1);

        let _ = std::fs::remove_dir_all(root);
    }
}
