//! Category repository.

use sqlx::PgPool;

use mercado_core::CategoryId;

use super::page::{Page, PageRequest};
use super::RepositoryError;
use crate::models::Category;

/// Columns `find_page` may sort by.
pub const SORTABLE: &[&str] = &["id", "name"];

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, (i32, String)>(
            "SELECT id, name FROM category WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, name)| Category {
            id: CategoryId::new(id),
            name,
        }))
    }

    /// List every category, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, (i32, String)>(
            "SELECT id, name FROM category ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category {
                id: CategoryId::new(id),
                name,
            })
            .collect())
    }

    /// Insert a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, name: &str) -> Result<Category, RepositoryError> {
        let (id,) = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO category (name) VALUES ($1) RETURNING id",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        Ok(Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
        })
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn rename(&self, id: CategoryId, name: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE category SET name = $2 WHERE id = $1")
            .bind(id.as_i32())
            .bind(name)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when products still reference
    /// the category, `NotFound` when it doesn't exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::fk_as_conflict(e, "category has related products"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// One page of categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn find_page(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Category>, RepositoryError> {
        let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM category")
            .fetch_one(self.pool)
            .await?;

        let query = format!(
            "SELECT id, name FROM category {} LIMIT $1 OFFSET $2",
            request.order_clause()
        );
        let rows = sqlx::query_as::<_, (i32, String)>(&query)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(self.pool)
            .await?;

        let content = rows
            .into_iter()
            .map(|(id, name)| Category {
                id: CategoryId::new(id),
                name,
            })
            .collect();

        Ok(Page::new(content, request, total))
    }
}
