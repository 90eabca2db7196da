//! Product route handlers.

use std::collections::BTreeSet;

use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use stride_core::catalog::{self, ListingQuery, SortKey};
use stride_core::{Page, Price, Product, ProductStatus};

use crate::catalog::load_products;
use crate::error::{AppError, Result};
use crate::middleware::Visitor;
use crate::state::AppState;

/// Upper bound of the listing's price slider.
pub const PRICE_SLIDER_MAX: Decimal = Decimal::from_parts(15000, 0, 0, false, 0);

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub price_display: String,
    pub inventory: u32,
    pub colors: Vec<String>,
    pub status: ProductStatus,
    pub available: bool,
    pub image_url: String,
    pub description: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            slug: product.slug.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            price_display: product.price.display(),
            inventory: product.inventory,
            colors: product.colors.clone(),
            status: product.status.clone(),
            available: product.status.is_available(),
            image_url: product.image_url.clone(),
            description: product.description.clone(),
        }
    }
}

/// Choices offered by the filter sidebar, drawn from the whole catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Facets {
    pub categories: BTreeSet<String>,
    pub colors: BTreeSet<String>,
    pub price_min: Decimal,
    pub price_max: Decimal,
}

impl Facets {
    fn from_products(products: &[Product]) -> Self {
        Self {
            categories: products
                .iter()
                .map(|p| p.category.clone())
                .filter(|c| !c.is_empty())
                .collect(),
            colors: products.iter().flat_map(|p| p.colors.iter().cloned()).collect(),
            price_min: Decimal::ZERO,
            price_max: PRICE_SLIDER_MAX,
        }
    }
}

/// An entry in the sort dropdown.
#[derive(Debug, Clone, Serialize)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Product listing response.
#[derive(Debug, Clone, Serialize)]
pub struct ListingResponse {
    pub page: Page<ProductView>,
    /// Canonical query string of this view, for shareable links.
    pub query: String,
    pub previous_page: Option<String>,
    pub next_page: Option<String>,
    pub sort_options: Vec<SortOption>,
    pub facets: Facets,
}

/// Product detail response.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetailResponse {
    pub product: ProductView,
    pub in_wishlist: bool,
}

/// Display product listing.
///
/// Filters, sort and page come from the query string. A catalog that cannot
/// be reached renders as an empty listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ListingResponse>> {
    let query = ListingQuery::from_query_string(raw.as_deref().unwrap_or_default())?;
    let criteria = query.criteria()?;
    let sort = query.sort_key();

    let products = load_products(state.catalog()).await;
    let listing = catalog::apply(&products, &criteria, sort);
    let page = Page::new(&listing, query.page_number(), state.config().page_size);

    let canonical = ListingQuery::from_criteria(&criteria, sort, page.current_page);
    let previous_page = page
        .has_previous
        .then(|| canonical.with_page(page.current_page - 1).to_query_string());
    let next_page = page
        .has_next
        .then(|| canonical.with_page(page.current_page + 1).to_query_string());

    tracing::debug!(
        matched = listing.len(),
        page = page.current_page,
        "Built product listing"
    );

    Ok(Json(ListingResponse {
        page: page.map(|product| ProductView::from(&product)),
        query: canonical.to_query_string(),
        previous_page,
        next_page,
        sort_options: SortKey::ALL
            .iter()
            .map(|key| SortOption {
                value: key.as_str(),
                label: key.label(),
                selected: *key == sort,
            })
            .collect(),
        facets: Facets::from_products(&products),
    }))
}

/// Display product detail.
#[instrument(skip(state, visitor), fields(slug = %slug))]
pub async fn show(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetailResponse>> {
    let document = state
        .catalog()
        .product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}'")))?;

    let product = Product::try_from(document).map_err(|e| {
        tracing::warn!(error = %e, "Product failed validation");
        AppError::NotFound(format!("product '{slug}'"))
    })?;

    let product_id = product.id.clone();
    let in_wishlist = state
        .shoppers()
        .with_shopper(visitor.0, move |shopper| {
            shopper.wishlist.is_in_wishlist(&product_id)
        })
        .await?;

    Ok(Json(ProductDetailResponse {
        product: ProductView::from(&product),
        in_wishlist,
    }))
}
