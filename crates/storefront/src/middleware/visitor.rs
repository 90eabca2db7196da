//! Anonymous visitor extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::session_keys;

/// The anonymous ID of the shopper making the request.
///
/// A new ID is minted and stored in the session on the visitor's first
/// request, which also makes the session layer issue the cookie.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Visitor(id): Visitor) -> impl IntoResponse {
///     format!("visitor {id}")
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visitor(pub Uuid);

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        if let Some(id) = session.get::<Uuid>(session_keys::VISITOR_ID).await? {
            return Ok(Self(id));
        }

        let id = Uuid::new_v4();
        session.insert(session_keys::VISITOR_ID, id).await?;
        tracing::debug!(visitor = %id, "New visitor");
        Ok(Self(id))
    }
}
