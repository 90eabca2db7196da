//! Wishlist route handlers.

use axum::{
    Form, Json,
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stride_core::{KeyValueStorage, ProductId, WishlistEntry, WishlistStore};

use super::{WISHLIST_UPDATED_TRIGGER, resolve_product};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::state::AppState;

/// Shown when a product record is missing data needed for a wishlist entry.
pub const UPDATE_WISHLIST_FAILED: &str = "Failed to update wishlist. Please try again.";

/// Wishlist entry display data.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistEntryView {
    pub product_id: String,
    pub slug: String,
    pub name: String,
    pub image_url: String,
    pub price: String,
}

impl From<&WishlistEntry> for WishlistEntryView {
    fn from(entry: &WishlistEntry) -> Self {
        Self {
            product_id: entry.product_id.to_string(),
            slug: entry.slug.to_string(),
            name: entry.name.clone(),
            image_url: entry.image_url.clone(),
            price: entry.price.display(),
        }
    }
}

/// Wishlist display data.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistView {
    pub entries: Vec<WishlistEntryView>,
    pub count: usize,
}

impl<S: KeyValueStorage> From<&WishlistStore<S>> for WishlistView {
    fn from(wishlist: &WishlistStore<S>) -> Self {
        Self {
            entries: wishlist.entries().iter().map(WishlistEntryView::from).collect(),
            count: wishlist.len(),
        }
    }
}

/// Membership of one product.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistStatusResponse {
    pub in_wishlist: bool,
}

/// Response to toggling a product.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleWishlistResponse {
    pub in_wishlist: bool,
    pub notice: String,
    pub count: usize,
}

/// Toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleWishlistForm {
    pub slug: String,
}

/// Remove form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromWishlistForm {
    pub product_id: String,
}

fn updated(view: impl IntoResponse) -> Response {
    (AppendHeaders([("HX-Trigger", WISHLIST_UPDATED_TRIGGER)]), view).into_response()
}

/// Display wishlist.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
) -> Result<Json<WishlistView>> {
    let view = state
        .shoppers()
        .with_shopper(visitor, |shopper| WishlistView::from(&shopper.wishlist))
        .await?;
    Ok(Json(view))
}

/// Save the product if it is not saved, unsave it if it is.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<ToggleWishlistForm>,
) -> Result<Response> {
    let product = resolve_product(&state, &form.slug, UPDATE_WISHLIST_FAILED).await?;

    let item = product.clone();
    let (in_wishlist, count) = state
        .shoppers()
        .with_shopper(visitor, move |shopper| {
            let in_wishlist = shopper.wishlist.toggle(&item);
            (in_wishlist, shopper.wishlist.len())
        })
        .await?;

    let notice = if in_wishlist {
        add_breadcrumb(
            "wishlist",
            "Added to wishlist",
            Some(&[("product_id", product.id.as_str())]),
        );
        format!("{} added to wishlist", product.name)
    } else {
        format!("{} removed from wishlist", product.name)
    };
    tracing::info!(product_id = %product.id, in_wishlist, "Toggled wishlist");

    Ok(updated(Json(ToggleWishlistResponse {
        in_wishlist,
        notice,
        count,
    })))
}

/// Unsave a product.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<RemoveFromWishlistForm>,
) -> Result<Response> {
    let (removed, view) = state
        .shoppers()
        .with_shopper(visitor, move |shopper| {
            let removed = shopper
                .wishlist
                .remove_from_wishlist(&ProductId::new(form.product_id));
            (removed, WishlistView::from(&shopper.wishlist))
        })
        .await?;

    if removed {
        Ok(updated(Json(view)))
    } else {
        Ok(Json(view).into_response())
    }
}

/// Whether a product is saved.
#[instrument(skip(state))]
pub async fn status(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Path(product_id): Path<String>,
) -> Result<Json<WishlistStatusResponse>> {
    let in_wishlist = state
        .shoppers()
        .with_shopper(visitor, move |shopper| {
            shopper
                .wishlist
                .is_in_wishlist(&ProductId::new(product_id))
        })
        .await?;
    Ok(Json(WishlistStatusResponse { in_wishlist }))
}
