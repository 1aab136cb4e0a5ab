//! Customer endpoints.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use mercado_core::CustomerId;

use crate::auth::{authorize_admin, CurrentPrincipal, OptionalPrincipal};
use crate::db::SortDirection;
use crate::dto::{CustomerRegistration, CustomerUpdate};
use crate::error::{AppError, Result};
use crate::routes::PageQuery;
use crate::services::customers::CustomerService;
use crate::state::AppState;

/// Customer routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clientes", post(register))
        .route("/clientes/{id}", get(find).put(update).delete(delete))
        .route("/clientes/email", get(find_by_email))
        .route("/clientes/page", get(find_page))
        .route("/clientes/picture", post(upload_picture))
}

/// `GET /clientes/{id}` - the owner policy runs in the service, so the
/// principal is optional here.
async fn find(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Path(id): Path<i32>,
) -> Result<Response> {
    let customer = CustomerService::new(&state)
        .find(principal.as_ref(), CustomerId::new(id))
        .await?;
    Ok(Json(customer).into_response())
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    value: String,
}

/// `GET /clientes/email?value=...`
async fn find_by_email(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Query(query): Query<EmailQuery>,
) -> Result<Response> {
    let customer = CustomerService::new(&state)
        .find_by_email(principal.as_ref(), &query.value)
        .await?;
    Ok(Json(customer).into_response())
}

/// `GET /clientes/page` - admin only.
async fn find_page(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    authorize_admin(principal.as_ref())?;

    let page = CustomerService::new(&state)
        .find_page(
            query.page,
            query.page_size(),
            query.order_by_or("nome"),
            query.direction_or(SortDirection::Ascending)?,
        )
        .await?;
    Ok(Json(page).into_response())
}

/// `POST /clientes` - public registration. Responds `201 Created` with
/// the new resource's location.
async fn register(
    State(state): State<AppState>,
    Json(registration): Json<CustomerRegistration>,
) -> Result<Response> {
    let customer = CustomerService::new(&state).register(registration).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/clientes/{}", customer.id))],
        Json(customer),
    )
        .into_response())
}

/// `PUT /clientes/{id}` - update the whitelisted contact fields.
async fn update(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Path(id): Path<i32>,
    Json(body): Json<CustomerUpdate>,
) -> Result<StatusCode> {
    CustomerService::new(&state)
        .update(principal.as_ref(), CustomerId::new(id), &body)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /clientes/{id}` - admin only; `409` when orders reference the
/// account.
async fn delete(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    authorize_admin(principal.as_ref())?;

    CustomerService::new(&state)
        .delete(CustomerId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /clientes/picture` - multipart upload of the caller's own
/// profile picture. Responds `201 Created` with the stored object's URL.
async fn upload_picture(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    mut multipart: Multipart,
) -> Result<Response> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("unreadable multipart body: {e}")))?
        .ok_or_else(|| AppError::BadRequest("multipart body has no file field".to_string()))?;
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("unreadable multipart field: {e}")))?;

    let url = CustomerService::new(&state)
        .upload_profile_picture(&principal, &bytes)
        .await?;

    Ok((StatusCode::CREATED, [(header::LOCATION, url)]).into_response())
}
