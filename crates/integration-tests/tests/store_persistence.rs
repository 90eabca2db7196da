//! Cart and wishlist stores persisted through file storage.
//!
//! Each test builds a store, mutates it, drops it, and rehydrates a second
//! store from the same directory, which is what happens when a visitor's
//! stores are evicted from memory and touched again.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use stride_core::{CartStore, KeyValueStorage, Product, ProductId, WishlistStore};
use stride_integration_tests::{document, temp_data_dir};
use stride_storefront::storage::FileStorage;

fn product(id: &str, price: i64) -> Product {
    Product::try_from(document(id, id, "Men's Shoes", price, &["Red"])).unwrap()
}

#[test]
fn test_cart_survives_reload() {
    let root = temp_data_dir("persist");
    let storage = FileStorage::new(&root, "visitor");
    let shoe = product("air-max-90", 12995);
    let tee = product("club-tee", 1495);

    {
        let mut cart = CartStore::load(storage.clone());
        cart.add_to_cart(&shoe, Some("9"));
        cart.add_to_cart(&shoe, Some("9"));
        cart.add_to_cart(&shoe, Some("10"));
        cart.add_to_cart(&tee, None);
    }

    let cart = CartStore::load(storage);
    assert_eq!(cart.line_count(), 3);
    assert_eq!(cart.item_count(), 4);
    assert_eq!(cart.items()[0].quantity, 2);
    assert_eq!(cart.items()[0].size.as_deref(), Some("9"));
    assert_eq!(
        cart.subtotal().amount(),
        Decimal::new(12995 * 3 + 1495, 0)
    );

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_removals_and_clear_are_persisted() {
    let root = temp_data_dir("persist");
    let storage = FileStorage::new(&root, "visitor");
    let shoe = product("air-max-90", 12995);

    {
        let mut cart = CartStore::load(storage.clone());
        cart.add_to_cart(&shoe, Some("9"));
        cart.add_to_cart(&shoe, Some("10"));
        assert_eq!(cart.remove_from_cart(&shoe.id, Some("9")), 1);
    }
    let mut cart = CartStore::load(storage.clone());
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.items()[0].size.as_deref(), Some("10"));

    cart.clear();
    drop(cart);
    assert!(CartStore::load(storage).is_empty());

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_wishlist_survives_reload_without_duplicates() {
    let root = temp_data_dir("persist");
    let storage = FileStorage::new(&root, "visitor");
    let shoe = product("air-max-90", 12995);
    let tee = product("club-tee", 1495);

    {
        let mut wishlist = WishlistStore::load(storage.clone());
        assert!(wishlist.add_to_wishlist(&shoe));
        assert!(!wishlist.add_to_wishlist(&shoe));
        assert!(wishlist.toggle(&tee));
    }

    let mut wishlist = WishlistStore::load(storage.clone());
    assert_eq!(wishlist.len(), 2);
    assert!(wishlist.is_in_wishlist(&ProductId::new("club-tee")));
    assert!(!wishlist.toggle(&tee));
    drop(wishlist);

    let wishlist = WishlistStore::load(storage);
    assert_eq!(wishlist.len(), 1);
    assert!(!wishlist.is_in_wishlist(&tee.id));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_cart_and_wishlist_share_a_directory() {
    let root = temp_data_dir("persist");
    let storage = FileStorage::new(&root, "visitor");
    let shoe = product("air-max-90", 12995);

    let mut cart = CartStore::load(storage.clone());
    let mut wishlist = WishlistStore::load(storage.clone());
    cart.add_to_cart(&shoe, None);
    wishlist.add_to_wishlist(&shoe);

    assert!(storage.dir().join("cart.json").exists());
    assert!(storage.dir().join("wishlist.json").exists());

    let cart_json: serde_json::Value =
        serde_json::from_str(&storage.get("cart").unwrap().unwrap()).unwrap();
    assert_eq!(cart_json.as_array().unwrap().len(), 1);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_corrupt_file_starts_empty() {
    let root = temp_data_dir("persist");
    let mut storage = FileStorage::new(&root, "visitor");
    storage.set("cart", "{not json").unwrap();

    let mut cart = CartStore::load(storage.clone());
    assert!(cart.is_empty());

    cart.add_to_cart(&product("air-max-90", 12995), None);
    assert_eq!(CartStore::load(storage).item_count(), 1);

    let _ = std::fs::remove_dir_all(root);
}
