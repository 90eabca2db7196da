//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Filtered, sorted, paginated listing
//! GET  /products/{slug}        - Product detail
//!
//! # Cart (mutations trigger cart-updated)
//! GET  /cart                   - Cart lines and order summary
//! POST /cart/add               - Add a product (by slug, optional size)
//! POST /cart/update            - Set a line's quantity (0 removes)
//! POST /cart/remove            - Remove a product's lines
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart badge count
//!
//! # Wishlist (mutations trigger wishlist-updated)
//! GET  /wishlist               - Saved products
//! POST /wishlist/toggle        - Save or unsave a product (by slug)
//! POST /wishlist/remove        - Unsave a product (by id)
//! GET  /wishlist/{product_id}  - Whether a product is saved
//! ```

pub mod cart;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use stride_core::Product;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// HTMX event fired after any cart mutation.
pub const CART_UPDATED_TRIGGER: &str = "cart-updated";

/// HTMX event fired after any wishlist mutation.
pub const WISHLIST_UPDATED_TRIGGER: &str = "wishlist-updated";

/// Look up a product by slug and validate it for adding to a store.
///
/// A record missing required data is reported with `notice`, the message shown
/// to the shopper, and the caller skips its mutation.
pub(crate) async fn resolve_product(state: &AppState, slug: &str, notice: &str) -> Result<Product> {
    let document = state
        .catalog()
        .product_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}'")))?;

    Product::try_from(document).map_err(|e| {
        tracing::warn!(slug = %slug, error = %e, "Product failed validation");
        AppError::InvalidProduct(notice.to_string())
    })
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
        .route("/{product_id}", get(wishlist::status))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
}
