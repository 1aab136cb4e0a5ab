//! City reference-data repository.

use sqlx::PgPool;

use mercado_core::{CityId, StateId};

use super::RepositoryError;
use crate::models::City;

/// Repository for city lookups. Cities and states are reference data
/// seeded by fixtures, so there are no write operations here.
pub struct CityRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CityRepository<'a> {
    /// Create a new city repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a city by id with its state joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CityId) -> Result<Option<City>, RepositoryError> {
        let row = sqlx::query_as::<_, (i32, String, i32, String)>(
            "SELECT c.id, c.name, s.id, s.name
             FROM city c
             JOIN state s ON s.id = c.state_id
             WHERE c.id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, name, state_id, state_name)| City {
            id: CityId::new(id),
            name,
            state_id: StateId::new(state_id),
            state_name,
        }))
    }
}
