//! Quantity-aware shopping cart.
//!
//! A cart holds at most one line per (product, size) pair. Adding a pair that
//! is already present bumps its quantity instead of appending a duplicate.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::storage::{self, CART_KEY, KeyValueStorage};
use crate::types::{CurrencyCode, Price, ProductId, Slug};

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub slug: Slug,
    pub size: Option<String>,
    pub quantity: u32,
}

impl CartLineItem {
    fn from_product(product: &Product, size: Option<String>) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            slug: product.slug.clone(),
            size,
            quantity: 1,
        }
    }

    /// Price of this line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    fn matches(&self, product_id: &ProductId, size: Option<&str>) -> bool {
        self.product_id == *product_id && self.size.as_deref() == size
    }
}

/// Totals shown next to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

/// Largest quantity a single cart line can hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Blank sizes mean "no size selected".
fn normalize_size(size: Option<&str>) -> Option<&str> {
    size.map(str::trim).filter(|s| !s.is_empty())
}

/// Cart line items mirrored to a [`KeyValueStorage`].
#[derive(Debug)]
pub struct CartStore<S> {
    items: Vec<CartLineItem>,
    storage: S,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Rehydrate the cart from `storage`.
    ///
    /// A missing or unreadable stored cart starts empty. Stored lines are
    /// normalized: blank sizes become "no size", lines for the same
    /// (product, size) are merged and empty lines are dropped.
    pub fn load(storage: S) -> Self {
        let stored: Vec<CartLineItem> = storage::load_collection(&storage, CART_KEY);
        let mut items: Vec<CartLineItem> = Vec::with_capacity(stored.len());

        for mut line in stored {
            line.size = normalize_size(line.size.as_deref()).map(str::to_string);
            line.quantity = line.quantity.min(MAX_LINE_QUANTITY);
            if line.quantity == 0 {
                continue;
            }

            if let Some(existing) = items
                .iter_mut()
                .find(|existing| existing.matches(&line.product_id, line.size.as_deref()))
            {
                existing.quantity = existing
                    .quantity
                    .saturating_add(line.quantity)
                    .min(MAX_LINE_QUANTITY);
            } else {
                items.push(line);
            }
        }

        tracing::debug!(lines = items.len(), "Cart rehydrated");
        Self { items, storage }
    }

    /// Add one unit of `product` in `size`.
    pub fn add_to_cart(&mut self, product: &Product, size: Option<&str>) {
        let size = normalize_size(size);

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.matches(&product.id, size))
        {
            line.quantity = line.quantity.saturating_add(1).min(MAX_LINE_QUANTITY);
        } else {
            self.items
                .push(CartLineItem::from_product(product, size.map(str::to_string)));
        }

        tracing::debug!(product_id = %product.id, size, "Added to cart");
        self.persist();
    }

    /// Remove lines for `product_id`.
    ///
    /// Without a size every line for the product goes; with a size only the
    /// exact (product, size) line is removed. Returns the number of lines
    /// removed.
    pub fn remove_from_cart(&mut self, product_id: &ProductId, size: Option<&str>) -> usize {
        let size = normalize_size(size);
        let before = self.items.len();

        self.items.retain(|line| match size {
            None => line.product_id != *product_id,
            Some(_) => !line.matches(product_id, size),
        });

        let removed = before - self.items.len();
        if removed > 0 {
            tracing::debug!(product_id = %product_id, size, removed, "Removed from cart");
        }
        self.persist();
        removed
    }

    /// Set the quantity of the exact (product, size) line. Zero removes it;
    /// anything above [`MAX_LINE_QUANTITY`] is capped.
    ///
    /// Returns `false` if no such line exists.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        size: Option<&str>,
        quantity: u32,
    ) -> bool {
        let size = normalize_size(size);
        let Some(index) = self
            .items
            .iter()
            .position(|line| line.matches(product_id, size))
        else {
            return false;
        };

        if quantity == 0 {
            self.items.remove(index);
        } else if let Some(line) = self.items.get_mut(index) {
            line.quantity = quantity.min(MAX_LINE_QUANTITY);
        }

        self.persist();
        true
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price times quantity over every line.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let currency = self
            .items
            .first()
            .map_or_else(CurrencyCode::default, |line| line.price.currency_code());

        self.items
            .iter()
            .fold(Price::zero(currency), |sum, line| sum.plus(&line.line_total()))
    }

    /// Subtotal, shipping and total. Delivery is free.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        let subtotal = self.subtotal();
        let shipping = Price::zero(subtotal.currency_code());
        OrderSummary {
            subtotal,
            shipping,
            total: subtotal.plus(&shipping),
        }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage, dropping the in-memory cart.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        storage::persist_collection(&mut self.storage, CART_KEY, &self.items);
    }
}
