//! Order endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use mercado_core::OrderId;

use crate::auth::{CurrentPrincipal, OptionalPrincipal};
use crate::db::SortDirection;
use crate::dto::OrderPayload;
use crate::error::Result;
use crate::routes::PageQuery;
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Order routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pedidos", get(find_page).post(place))
        .route("/pedidos/{id}", get(find))
}

/// `GET /pedidos/{id}` - owner or admin.
async fn find(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Path(id): Path<i32>,
) -> Result<Response> {
    let order = OrderService::new(&state)
        .find(principal.as_ref(), OrderId::new(id))
        .await?;
    Ok(Json(order).into_response())
}

/// `GET /pedidos` - the authenticated customer's own orders, newest
/// first by default.
async fn find_page(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page = OrderService::new(&state)
        .find_page(
            &principal,
            query.page,
            query.page_size(),
            query.order_by_or("instante"),
            query.direction_or(SortDirection::Descending)?,
        )
        .await?;
    Ok(Json(page).into_response())
}

/// `POST /pedidos` - place an order for the authenticated customer.
/// Responds `201 Created` with the new resource's location.
async fn place(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Json(payload): Json<OrderPayload>,
) -> Result<Response> {
    let order = OrderService::new(&state).place(&principal, payload).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/pedidos/{}", order.id))],
        Json(order),
    )
        .into_response())
}
