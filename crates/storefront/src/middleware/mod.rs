//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fills the span field, echoes `x-request-id`)
//! 4. Session layer (tower-sessions, in-memory store)
//!
//! Handlers identify the shopper with the [`Visitor`] extractor, which reads
//! (or mints) the anonymous visitor ID held in the session.

pub mod request_id;
pub mod session;
pub mod visitor;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::create_session_layer;
pub use visitor::Visitor;
