//! Security gate: stateless bearer authentication with public allow-lists.
//!
//! Classifies every inbound request path against two allow-lists - paths
//! with unconditional public access, and paths public for read-only (GET)
//! access - and requires a valid, unexpired bearer token for everything
//! else. No server-side session is ever created; each request carries its
//! own proof of identity.
//!
//! On success the reconstructed [`Principal`](crate::auth::Principal) is
//! inserted into request extensions for the
//! [`CurrentPrincipal`](crate::auth::CurrentPrincipal) /
//! [`OptionalPrincipal`](crate::auth::OptionalPrincipal) extractors.
//! Unauthenticated non-whitelisted requests are rejected 401 before any
//! handler executes.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Paths with unconditional public access.
const PUBLIC: &[&str] = &["/health", "/health/ready"];

/// Path trees public for read-only (GET) access: the product and category
/// catalog, and the customer collection (individual records still pass
/// through the service-level owner policy).
const PUBLIC_GET: &[&str] = &["/produtos", "/categorias", "/clientes"];

/// POST paths reachable without a token: registration and login cannot
/// require one.
const PUBLIC_POST: &[&str] = &["/clientes", "/auth/login"];

/// Whether `path` equals a listed prefix or sits below it.
fn under_any(path: &str, prefixes: &[&str]) -> bool {
    prefixes
        .iter()
        .any(|p| path == *p || path.strip_prefix(p).is_some_and(|rest| rest.starts_with('/')))
}

/// Whether the request may proceed without authentication.
fn is_public(method: &Method, path: &str) -> bool {
    if under_any(path, PUBLIC) {
        return true;
    }
    match *method {
        Method::GET => under_any(path, PUBLIC_GET),
        Method::POST => PUBLIC_POST.contains(&path),
        _ => false,
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// The gate itself, installed with `middleware::from_fn_with_state`.
///
/// A valid token attaches a principal even on public paths, so that
/// publicly reachable lookups can still apply the owner policy. An invalid
/// or missing token only rejects when the path is not whitelisted.
pub async fn security_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let verified = bearer_token(req.headers()).map(|token| state.tokens().verify(token));

    match verified {
        Some(Ok(principal)) => {
            req.extensions_mut().insert(principal);
        }
        Some(Err(err)) if !is_public(req.method(), req.uri().path()) => {
            return AppError::from(err).into_response();
        }
        None if !is_public(req.method(), req.uri().path()) => {
            return AppError::Unauthorized("authentication required".to_string()).into_response();
        }
        // Public path without a usable token: proceed unauthenticated.
        _ => {}
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_public_for_get_only() {
        assert!(is_public(&Method::GET, "/produtos"));
        assert!(is_public(&Method::GET, "/produtos/3"));
        assert!(is_public(&Method::GET, "/categorias/1"));
        assert!(is_public(&Method::GET, "/clientes/email"));

        assert!(!is_public(&Method::POST, "/produtos"));
        assert!(!is_public(&Method::PUT, "/categorias/1"));
        assert!(!is_public(&Method::DELETE, "/clientes/5"));
    }

    #[test]
    fn test_registration_and_login_are_public() {
        assert!(is_public(&Method::POST, "/clientes"));
        assert!(is_public(&Method::POST, "/auth/login"));
    }

    #[test]
    fn test_protected_paths() {
        assert!(!is_public(&Method::POST, "/auth/refresh_token"));
        assert!(!is_public(&Method::POST, "/clientes/picture"));
        assert!(!is_public(&Method::GET, "/pedidos"));
        assert!(!is_public(&Method::POST, "/pedidos"));
    }

    #[test]
    fn test_prefix_matching_does_not_leak_siblings() {
        // "/produtosx" must not match the "/produtos" tree.
        assert!(!is_public(&Method::GET, "/produtosx"));
    }

    #[test]
    fn test_health_is_always_public() {
        assert!(is_public(&Method::GET, "/health"));
        assert!(is_public(&Method::GET, "/health/ready"));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, "Basic dXNlcg==".parse().unwrap());
        assert!(bearer_token(&headers).is_none());
    }
}
