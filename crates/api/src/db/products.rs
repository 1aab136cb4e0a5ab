//! Product repository.

use sqlx::PgPool;

use mercado_core::{CategoryId, ProductId};

use super::page::{Page, PageRequest};
use super::RepositoryError;
use crate::models::{Category, NewProduct, Product};

/// Columns `find_page` and `search` may sort by.
pub const SORTABLE: &[&str] = &["id", "name", "price"];

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by id with its categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, (i32, String, rust_decimal::Decimal)>(
            "SELECT id, name, price FROM product WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some((id, name, price)) = row else {
            return Ok(None);
        };

        let id = ProductId::new(id);
        Ok(Some(Product {
            id,
            name,
            price,
            categories: self.categories_of(id).await?,
        }))
    }

    /// Insert a product and its category links in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when a category id doesn't
    /// exist, `Database` otherwise.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id,) = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO product (name, price) VALUES ($1, $2) RETURNING id",
        )
        .bind(&new.name)
        .bind(new.price)
        .fetch_one(&mut *tx)
        .await?;

        for category_id in &new.category_ids {
            sqlx::query("INSERT INTO product_category (product_id, category_id) VALUES ($1, $2)")
                .bind(id)
                .bind(category_id.as_i32())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    RepositoryError::fk_as_conflict(e, "product references a missing category")
                })?;
        }

        tx.commit().await?;

        let id = ProductId::new(id);
        Ok(Product {
            id,
            name: new.name.clone(),
            price: new.price,
            categories: self.categories_of(id).await?,
        })
    }

    /// Replace a product's fields and category links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist,
    /// `Conflict` when a category id doesn't exist.
    pub async fn update(&self, id: ProductId, new: &NewProduct) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE product SET name = $2, price = $3 WHERE id = $1")
            .bind(id.as_i32())
            .bind(&new.name)
            .bind(new.price)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM product_category WHERE product_id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;
        for category_id in &new.category_ids {
            sqlx::query("INSERT INTO product_category (product_id, category_id) VALUES ($1, $2)")
                .bind(id.as_i32())
                .bind(category_id.as_i32())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    RepositoryError::fk_as_conflict(e, "product references a missing category")
                })?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a product and its category links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when order items still
    /// reference the product, `NotFound` when it doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM product_category WHERE product_id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::fk_as_conflict(e, "product has related order items"))?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Search by partial name within the given categories, paginated.
    ///
    /// An empty `category_ids` list matches products in any category,
    /// mirroring an unconstrained search. The name match is
    /// case-insensitive contains.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn search(
        &self,
        name: &str,
        category_ids: &[CategoryId],
        request: &PageRequest,
    ) -> Result<Page<Product>, RepositoryError> {
        let ids: Vec<i32> = category_ids.iter().map(CategoryId::as_i32).collect();
        let category_filter = if ids.is_empty() {
            ""
        } else {
            " AND id IN (SELECT product_id FROM product_category WHERE category_id = ANY($2))"
        };

        let count_query = format!(
            "SELECT COUNT(*) FROM product WHERE name ILIKE '%' || $1 || '%'{category_filter}"
        );
        let mut count = sqlx::query_as::<_, (i64,)>(&count_query).bind(name);
        if !ids.is_empty() {
            count = count.bind(&ids);
        }
        let (total,) = count.fetch_one(self.pool).await?;

        let (limit_bind, offset_bind) = if ids.is_empty() { (2, 3) } else { (3, 4) };
        let page_query = format!(
            "SELECT id, name, price FROM product
             WHERE name ILIKE '%' || $1 || '%'{category_filter}
             {} LIMIT ${limit_bind} OFFSET ${offset_bind}",
            request.order_clause()
        );
        let mut rows =
            sqlx::query_as::<_, (i32, String, rust_decimal::Decimal)>(&page_query).bind(name);
        if !ids.is_empty() {
            rows = rows.bind(&ids);
        }
        let rows = rows
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(self.pool)
            .await?;

        let mut content = Vec::with_capacity(rows.len());
        for (id, name, price) in rows {
            let id = ProductId::new(id);
            content.push(Product {
                id,
                name,
                price,
                categories: self.categories_of(id).await?,
            });
        }

        Ok(Page::new(content, request, total))
    }

    /// The categories a product belongs to.
    async fn categories_of(&self, id: ProductId) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, (i32, String)>(
            "SELECT c.id, c.name
             FROM category c
             JOIN product_category pc ON pc.category_id = c.id
             WHERE pc.product_id = $1
             ORDER BY c.name",
        )
        .bind(id.as_i32())
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
}
