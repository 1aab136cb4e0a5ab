//! Category endpoints. Reads are public, writes are admin only.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use mercado_core::CategoryId;

use crate::auth::{authorize_admin, OptionalPrincipal};
use crate::db::SortDirection;
use crate::dto::CategoryPayload;
use crate::error::Result;
use crate::routes::PageQuery;
use crate::services::catalog::CategoryService;
use crate::state::AppState;

/// Category routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categorias", get(list).post(create))
        .route("/categorias/{id}", get(find).put(update).delete(delete))
        .route("/categorias/page", get(find_page))
}

/// `GET /categorias/{id}`
async fn find(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Response> {
    let category = CategoryService::new(&state)
        .find(CategoryId::new(id))
        .await?;
    Ok(Json(category).into_response())
}

/// `GET /categorias`
async fn list(State(state): State<AppState>) -> Result<Response> {
    let categories = CategoryService::new(&state).list().await?;
    Ok(Json(categories).into_response())
}

/// `GET /categorias/page`
async fn find_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page = CategoryService::new(&state)
        .find_page(
            query.page,
            query.page_size(),
            query.order_by_or("nome"),
            query.direction_or(SortDirection::Ascending)?,
        )
        .await?;
    Ok(Json(page).into_response())
}

/// `POST /categorias` - admin only.
async fn create(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Json(body): Json<CategoryPayload>,
) -> Result<Response> {
    authorize_admin(principal.as_ref())?;
    let name = body.validate()?;

    let category = CategoryService::new(&state).insert(&name).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/categorias/{}", category.id))],
        Json(category),
    )
        .into_response())
}

/// `PUT /categorias/{id}` - admin only.
async fn update(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Path(id): Path<i32>,
    Json(body): Json<CategoryPayload>,
) -> Result<StatusCode> {
    authorize_admin(principal.as_ref())?;
    let name = body.validate()?;

    CategoryService::new(&state)
        .update(CategoryId::new(id), &name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /categorias/{id}` - admin only; `409` when products reference
/// the category.
async fn delete(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    authorize_admin(principal.as_ref())?;

    CategoryService::new(&state)
        .delete(CategoryId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
