//! HTTP route handlers.
//!
//! # Endpoints
//!
//! | Method | Path                   | Access         | Description              |
//! |--------|------------------------|----------------|--------------------------|
//! | POST   | `/auth/login`          | public         | Issue a bearer token     |
//! | POST   | `/auth/refresh_token`  | authenticated  | Re-issue a fresh token   |
//! | GET    | `/clientes/{id}`       | owner or admin | Customer by id           |
//! | GET    | `/clientes/email`      | owner or admin | Customer by email        |
//! | GET    | `/clientes/page`       | admin          | Paginated customers      |
//! | POST   | `/clientes`            | public         | Register                 |
//! | PUT    | `/clientes/{id}`       | owner or admin | Update contact fields    |
//! | DELETE | `/clientes/{id}`       | admin          | Delete (blocked by FKs)  |
//! | POST   | `/clientes/picture`    | authenticated  | Upload profile picture   |
//! | GET    | `/categorias/{id}`     | public         | Category by id           |
//! | GET    | `/categorias`          | public         | All categories           |
//! | GET    | `/categorias/page`     | public         | Paginated categories     |
//! | POST   | `/categorias`          | admin          | Create category          |
//! | PUT    | `/categorias/{id}`     | admin          | Rename category          |
//! | DELETE | `/categorias/{id}`     | admin          | Delete (blocked by FKs)  |
//! | GET    | `/produtos/{id}`       | public         | Product by id            |
//! | GET    | `/produtos`            | public         | Search, paginated        |
//! | POST   | `/produtos`            | admin          | Create product           |
//! | PUT    | `/produtos/{id}`       | admin          | Update product           |
//! | DELETE | `/produtos/{id}`       | admin          | Delete (blocked by FKs)  |
//! | GET    | `/pedidos/{id}`        | owner or admin | Order by id              |
//! | GET    | `/pedidos`             | authenticated  | Own orders, paginated    |
//! | POST   | `/pedidos`             | authenticated  | Place an order           |

pub mod auth;
pub mod categories;
pub mod customers;
pub mod orders;
pub mod products;

use axum::Router;
use serde::Deserialize;

use crate::db::SortDirection;
use crate::error::AppError;
use crate::state::AppState;

/// Assemble all API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(customers::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(orders::router())
}

/// Common pagination query parameters. Defaults vary per listing, so the
/// optional fields are resolved in each handler.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(rename = "linesPerPage")]
    pub lines_per_page: Option<u32>,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
    pub direction: Option<String>,
}

impl PageQuery {
    /// Default page size shared by every listing.
    pub const DEFAULT_PAGE_SIZE: u32 = 24;

    /// Resolve the page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.lines_per_page.unwrap_or(Self::DEFAULT_PAGE_SIZE)
    }

    /// Resolve the sort key, falling back to the listing's default.
    #[must_use]
    pub fn order_by_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.order_by.as_deref().unwrap_or(default)
    }

    /// Resolve the sort direction, falling back to the listing's default.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for anything but `ASC`/`DESC`.
    pub fn direction_or(&self, default: SortDirection) -> Result<SortDirection, AppError> {
        match &self.direction {
            None => Ok(default),
            Some(raw) => SortDirection::parse(raw).ok_or_else(|| {
                AppError::BadRequest(format!("direction must be ASC or DESC, got '{raw}'"))
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query: PageQuery = serde_urlencoded::from_str("").unwrap();
        assert_eq!(query.page, 0);
        assert_eq!(query.page_size(), 24);
        assert_eq!(query.order_by_or("nome"), "nome");
        assert_eq!(
            query.direction_or(SortDirection::Ascending).unwrap(),
            SortDirection::Ascending
        );
    }

    #[test]
    fn test_page_query_explicit_values() {
        let query: PageQuery =
            serde_urlencoded::from_str("page=2&linesPerPage=10&orderBy=email&direction=DESC")
                .unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.page_size(), 10);
        assert_eq!(query.order_by_or("nome"), "email");
        assert_eq!(
            query.direction_or(SortDirection::Ascending).unwrap(),
            SortDirection::Descending
        );
    }

    #[test]
    fn test_page_query_bad_direction() {
        let query: PageQuery = serde_urlencoded::from_str("direction=SIDEWAYS").unwrap();
        assert!(query.direction_or(SortDirection::Ascending).is_err());
    }
}
