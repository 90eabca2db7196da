//! GROQ queries against the product schema.
//!
//! Every query projects the same flat shape so results deserialize straight
//! into [`stride_core::ProductDocument`]. Values supplied by visitors are
//! passed as query parameters, never spliced into the query text.

/// Projection shared by every product query.
pub const PRODUCT_PROJECTION: &str = r#"{
  _id,
  productName,
  category,
  price,
  inventory,
  colors,
  status,
  "imageUrl": image.asset->url,
  description,
  "slug": slug.current
}"#;

/// All published products.
#[must_use]
pub fn all_products() -> String {
    format!(r#"*[_type == "product"] {PRODUCT_PROJECTION}"#)
}

/// The first product whose slug equals `$slug`.
#[must_use]
pub fn product_by_slug() -> String {
    format!(r#"*[_type == "product" && slug.current == $slug][0] {PRODUCT_PROJECTION}"#)
}
