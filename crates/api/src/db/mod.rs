//! Database operations for the Mercado `PostgreSQL` instance.
//!
//! ## Tables
//!
//! - `customer`, `customer_role`, `customer_phone`, `address` - accounts
//! - `city`, `state` - location reference data
//! - `category`, `product`, `product_category` - catalog
//! - `customer_order`, `order_item` - orders
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and are applied on
//! startup only when `MERCADO_RUN_MIGRATIONS=true`.

pub mod categories;
pub mod cities;
pub mod customers;
pub mod orders;
pub mod page;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use cities::CityRepository;
pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use page::{Page, PageRequest, SortDirection};
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (unique email, referential integrity).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Translate a sqlx error, mapping foreign key violations to
    /// `Conflict` with the given message.
    pub(crate) fn fk_as_conflict(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_foreign_key_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(err)
    }

    /// Translate a sqlx error, mapping unique violations to `Conflict`
    /// with the given message.
    pub(crate) fn unique_as_conflict(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
