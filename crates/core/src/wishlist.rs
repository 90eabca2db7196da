//! Wishlist store.
//!
//! Same persistence model as the cart, without quantities: a product is
//! either on the wishlist once or not at all.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::storage::{self, KeyValueStorage, WISHLIST_KEY};
use crate::types::{Price, ProductId, Slug};

/// A saved product, with enough display data to render without refetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub slug: Slug,
}

impl From<&Product> for WishlistEntry {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            slug: product.slug.clone(),
        }
    }
}

/// Wishlist entries mirrored to a [`KeyValueStorage`].
#[derive(Debug)]
pub struct WishlistStore<S> {
    entries: Vec<WishlistEntry>,
    storage: S,
}

impl<S: KeyValueStorage> WishlistStore<S> {
    /// Rehydrate the wishlist from `storage`.
    pub fn load(storage: S) -> Self {
        let mut entries: Vec<WishlistEntry> = storage::load_collection(&storage, WISHLIST_KEY);

        // Older writers appended without checking membership.
        let mut seen = std::collections::HashSet::new();
        entries.retain(|entry| seen.insert(entry.product_id.clone()));

        Self { entries, storage }
    }

    /// Save `product`. Returns `false` if it was already saved.
    pub fn add_to_wishlist(&mut self, product: &Product) -> bool {
        if self.is_in_wishlist(&product.id) {
            return false;
        }
        self.entries.push(WishlistEntry::from(product));
        tracing::debug!(product_id = %product.id, "Added to wishlist");
        self.persist();
        true
    }

    /// Drop `product_id`. Returns `false` if it was not saved.
    pub fn remove_from_wishlist(&mut self, product_id: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.product_id != *product_id);
        if self.entries.len() == before {
            return false;
        }
        tracing::debug!(product_id = %product_id, "Removed from wishlist");
        self.persist();
        true
    }

    /// Flip membership of `product`. Returns whether it is saved afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.remove_from_wishlist(&product.id) {
            false
        } else {
            self.add_to_wishlist(product)
        }
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.product_id == *product_id)
    }

    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        storage::persist_collection(&mut self.storage, WISHLIST_KEY, &self.entries);
    }
}
