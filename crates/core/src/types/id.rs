//! Newtype IDs for type-safe catalog references.
//!
//! Catalog identifiers are opaque strings assigned by the content API.
//! Use the `define_id!` macro to create wrappers that prevent accidentally
//! mixing a document ID with a URL slug.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use stride_core::define_id;
/// define_id!(DocumentId);
/// define_id!(AssetId);
///
/// let doc = DocumentId::new("product-1");
/// let asset = AssetId::new("image-1");
///
/// // These are different types, so this won't compile:
/// // let _: DocumentId = asset;
/// assert_eq!(doc.as_str(), "product-1");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Catalog identifiers
define_id!(ProductId);
define_id!(Slug);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = ProductId::new("abc123");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"abc123\"");
    }

    #[test]
    fn test_id_display() {
        let slug = Slug::from("air-max-90");
        assert_eq!(slug.to_string(), "air-max-90");
    }
}
