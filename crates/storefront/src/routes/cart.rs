//! Cart route handlers.
//!
//! Each visitor's cart lives in their [`Shopper`](crate::shoppers::Shopper)
//! stores. Mutations answer with an `HX-Trigger: cart-updated` header so the
//! badge and order summary can refresh without a full reload.

use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stride_core::{CartLineItem, CartStore, KeyValueStorage, OrderSummary, Price, ProductId};

use super::{CART_UPDATED_TRIGGER, resolve_product};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::state::AppState;

/// Shown when a product record is missing data needed for a cart line.
pub const ADD_TO_CART_FAILED: &str = "Failed to add to cart. Please try again.";

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: String,
    pub slug: String,
    pub name: String,
    pub image_url: String,
    pub size: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartLineItem> for CartLineView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            slug: line.slug.to_string(),
            name: line.name.clone(),
            image_url: line.image_url.clone(),
            size: line.size.clone(),
            quantity: line.quantity,
            price: line.price.display(),
            line_price: line.line_total().display(),
        }
    }
}

/// Order summary display data.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummaryView {
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub free_shipping: bool,
}

impl From<OrderSummary> for OrderSummaryView {
    fn from(summary: OrderSummary) -> Self {
        Self {
            subtotal: summary.subtotal.display(),
            shipping: summary.shipping.display(),
            total: summary.total.display(),
            free_shipping: summary.shipping.amount().is_zero(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub item_count: u32,
    pub line_count: usize,
    pub summary: OrderSummaryView,
    pub total: Price,
}

impl<S: KeyValueStorage> From<&CartStore<S>> for CartView {
    fn from(cart: &CartStore<S>) -> Self {
        let summary = cart.summary();
        Self {
            items: cart.items().iter().map(CartLineView::from).collect(),
            item_count: cart.item_count(),
            line_count: cart.line_count(),
            total: summary.total,
            summary: summary.into(),
        }
    }
}

/// Response to adding a product.
#[derive(Debug, Clone, Serialize)]
pub struct AddToCartResponse {
    pub notice: String,
    pub count: u32,
}

/// Cart badge count.
#[derive(Debug, Clone, Serialize)]
pub struct CartCountResponse {
    pub count: u32,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    pub size: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub size: Option<String>,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
    pub size: Option<String>,
}

fn updated(view: impl IntoResponse) -> Response {
    (AppendHeaders([("HX-Trigger", CART_UPDATED_TRIGGER)]), view).into_response()
}

/// Display cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Visitor(visitor): Visitor) -> Result<Json<CartView>> {
    let view = state
        .shoppers()
        .with_shopper(visitor, |shopper| CartView::from(&shopper.cart))
        .await?;
    Ok(Json(view))
}

/// Add a product to the cart.
///
/// Adding a (product, size) pair already in the cart bumps its quantity.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = resolve_product(&state, &form.slug, ADD_TO_CART_FAILED).await?;

    let item = product.clone();
    let count = state
        .shoppers()
        .with_shopper(visitor, move |shopper| {
            shopper.cart.add_to_cart(&item, form.size.as_deref());
            shopper.cart.item_count()
        })
        .await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str())]),
    );
    tracing::info!(product_id = %product.id, count, "Added to cart");

    Ok(updated(Json(AddToCartResponse {
        notice: format!("{} added to cart!", product.name),
        count,
    })))
}

/// Set a cart line's quantity. Zero removes the line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);

    let (changed, view) = {
        let product_id = product_id.clone();
        state
            .shoppers()
            .with_shopper(visitor, move |shopper| {
                let changed =
                    shopper
                        .cart
                        .update_quantity(&product_id, form.size.as_deref(), form.quantity);
                (changed, CartView::from(&shopper.cart))
            })
            .await?
    };

    if changed {
        Ok(updated(Json(view)))
    } else {
        tracing::debug!(product_id = %product_id, "No cart line to update");
        Ok(Json(view).into_response())
    }
}

/// Remove a product from the cart.
///
/// With a size only that line goes; without one every line for the product
/// goes.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let (removed, view) = state
        .shoppers()
        .with_shopper(visitor, move |shopper| {
            let removed = shopper
                .cart
                .remove_from_cart(&ProductId::new(form.product_id), form.size.as_deref());
            (removed, CartView::from(&shopper.cart))
        })
        .await?;
    tracing::debug!(removed, "Removed cart lines");

    Ok(updated(Json(view)))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>, Visitor(visitor): Visitor) -> Result<Response> {
    let view = state
        .shoppers()
        .with_shopper(visitor, |shopper| {
            shopper.cart.clear();
            CartView::from(&shopper.cart)
        })
        .await?;

    Ok(updated(Json(view)))
}

/// Get cart badge count.
#[instrument(skip(state))]
pub async fn count(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
) -> Result<Json<CartCountResponse>> {
    let count = state
        .shoppers()
        .with_shopper(visitor, |shopper| shopper.cart.item_count())
        .await?;
    Ok(Json(CartCountResponse { count }))
}
