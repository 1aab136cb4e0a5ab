//! Login and token refresh endpoints.
//!
//! Both respond `204 No Content` with the token in the `Authorization`
//! response header rather than a JSON body; clients echo the header back
//! on subsequent requests.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::auth::CurrentPrincipal;
use crate::dto::LoginRequest;
use crate::error::Result;
use crate::services;
use crate::state::AppState;

/// Auth routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh_token", post(refresh_token))
}

/// `POST /auth/login` - verify credentials, issue a token.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response> {
    let token = services::auth::login(&state, &request).await?;
    Ok(bearer_response(&token))
}

/// `POST /auth/refresh_token` - re-issue a token for the authenticated
/// principal, restarting the expiry window.
async fn refresh_token(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<Response> {
    let token = services::auth::refresh(&state, &principal)?;
    Ok(bearer_response(&token))
}

/// 204 with the freshly minted token in the `Authorization` header.
/// The expose header lets browser clients read it cross-origin.
fn bearer_response(token: &str) -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::AUTHORIZATION, format!("Bearer {token}")),
            (
                header::ACCESS_CONTROL_EXPOSE_HEADERS,
                "Authorization".to_string(),
            ),
        ],
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_response_shape() {
        let response = bearer_response("abc.def.ghi");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let auth = response.headers().get(header::AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer abc.def.ghi");
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_EXPOSE_HEADERS));
    }
}
