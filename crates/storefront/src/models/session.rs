//! Session-related types.
//!
//! The storefront has no accounts. A visitor is an anonymous ID minted on
//! their first request and kept in the session cookie's server-side record.

/// Session keys for visitor data.
pub mod keys {
    /// Key for the visitor's anonymous ID (UUID v4).
    pub const VISITOR_ID: &str = "visitor_id";
}
