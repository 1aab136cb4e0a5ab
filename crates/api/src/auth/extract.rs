//! Principal extractors for route handlers.
//!
//! The security gate verifies the bearer token and stores the resulting
//! [`Principal`] in request extensions; these extractors hand it to
//! handlers without re-parsing the token.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::Principal;
use crate::error::AppError;

/// Extractor that requires an authenticated principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn refresh(CurrentPrincipal(principal): CurrentPrincipal) -> impl IntoResponse {
///     format!("hello, {}", principal.username)
/// }
/// ```
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))
    }
}

/// Extractor that optionally gets the current principal.
///
/// Unlike [`CurrentPrincipal`], this does not reject the request when no
/// token was presented. Used by publicly readable lookups whose service
/// layer applies the owner policy itself.
pub struct OptionalPrincipal(pub Option<Principal>);

impl<S> FromRequestParts<S> for OptionalPrincipal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Principal>().cloned()))
    }
}
