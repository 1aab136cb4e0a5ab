//! Product endpoints. Reads are public, writes are admin only.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use mercado_core::{CategoryId, ProductId};

use crate::auth::{authorize_admin, OptionalPrincipal};
use crate::db::SortDirection;
use crate::dto::ProductPayload;
use crate::error::Result;
use crate::routes::PageQuery;
use crate::services::catalog::ProductService;
use crate::state::AppState;

/// Product routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/produtos", get(search).post(create))
        .route("/produtos/{id}", get(find).put(update).delete(delete))
}

/// `GET /produtos/{id}`
async fn find(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Response> {
    let product = ProductService::new(&state).find(ProductId::new(id)).await?;
    Ok(Json(product).into_response())
}

/// Search filters plus the page parameters. Declared inline rather than
/// flattening [`PageQuery`]: urlencoded deserialization buffers flattened
/// fields as strings and then rejects the numeric ones.
#[derive(Debug, Deserialize)]
struct SearchQuery {
    /// Partial product name, case-insensitive.
    #[serde(rename = "nome", default)]
    name: String,
    /// Comma-separated category ids, e.g. `1,3,4`.
    #[serde(rename = "categorias", default)]
    categories: String,
    #[serde(default)]
    page: u32,
    #[serde(rename = "linesPerPage")]
    lines_per_page: Option<u32>,
    #[serde(rename = "orderBy")]
    order_by: Option<String>,
    direction: Option<String>,
}

impl SearchQuery {
    fn paging(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            lines_per_page: self.lines_per_page,
            order_by: self.order_by.clone(),
            direction: self.direction.clone(),
        }
    }
}

/// `GET /produtos?nome=...&categorias=1,3` - paginated search.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let category_ids = parse_id_list(&query.categories);
    let paging = query.paging();

    let page = ProductService::new(&state)
        .search(
            &query.name,
            &category_ids,
            paging.page,
            paging.page_size(),
            paging.order_by_or("nome"),
            paging.direction_or(SortDirection::Ascending)?,
        )
        .await?;
    Ok(Json(page).into_response())
}

/// `POST /produtos` - admin only.
async fn create(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Json(body): Json<ProductPayload>,
) -> Result<Response> {
    authorize_admin(principal.as_ref())?;
    body.validate()?;

    let product = ProductService::new(&state)
        .insert(
            body.name,
            body.price,
            body.category_ids.into_iter().map(CategoryId::new).collect(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/produtos/{}", product.id))],
        Json(product),
    )
        .into_response())
}

/// `PUT /produtos/{id}` - admin only.
async fn update(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Path(id): Path<i32>,
    Json(body): Json<ProductPayload>,
) -> Result<StatusCode> {
    authorize_admin(principal.as_ref())?;
    body.validate()?;

    ProductService::new(&state)
        .update(
            ProductId::new(id),
            body.name,
            body.price,
            body.category_ids.into_iter().map(CategoryId::new).collect(),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /produtos/{id}` - admin only; `409` when order items reference
/// the product.
async fn delete(
    State(state): State<AppState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    authorize_admin(principal.as_ref())?;

    ProductService::new(&state).delete(ProductId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Parse a comma-separated id list; malformed entries are skipped.
fn parse_id_list(raw: &str) -> Vec<CategoryId> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<i32>().ok())
        .map(CategoryId::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(
            parse_id_list("1,3, 4"),
            vec![CategoryId::new(1), CategoryId::new(3), CategoryId::new(4)]
        );
        assert!(parse_id_list("").is_empty());
        assert_eq!(parse_id_list("2,x,5"), vec![CategoryId::new(2), CategoryId::new(5)]);
    }
}
