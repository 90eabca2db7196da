//! Stride Core - Storefront domain library.
//!
//! This crate provides the pieces of the storefront that do not depend on
//! HTTP or the content API:
//! - Catalog types (`Product`, `Price`, `ProductStatus`)
//! - Cart and wishlist stores with pluggable persistence
//! - The listing engine (filtering, sorting, pagination)
//!
//! # Architecture
//!
//! Stores are plain values constructed over a [`storage::KeyValueStorage`]
//! implementation. They rehydrate once at construction and write through on
//! every mutation. Storage failures are logged and never surface to callers:
//! the in-memory collection stays authoritative.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, and statuses
//! - [`product`] - Raw catalog documents and validated products
//! - [`storage`] - Key/value persistence capability
//! - [`cart`] - Quantity-aware cart store
//! - [`wishlist`] - Wishlist store
//! - [`catalog`] - Filter criteria, sort keys, and the listing query string
//! - [`pagination`] - Page windows over ordered collections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod pagination;
pub mod product;
pub mod storage;
pub mod types;
pub mod wishlist;

pub use cart::{CartLineItem, CartStore, MAX_LINE_QUANTITY, OrderSummary};
pub use catalog::{FilterCriteria, ListingQuery, PriceRange, SortKey};
pub use pagination::{Page, paginate};
pub use product::{Product, ProductDocument, ProductError};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use types::*;
pub use wishlist::{WishlistEntry, WishlistStore};
