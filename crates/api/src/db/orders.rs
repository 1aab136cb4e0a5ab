//! Order repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use mercado_core::{AddressId, CustomerId, OrderId, ProductId};

use super::page::{Page, PageRequest};
use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderItem};

/// Columns `find_page_by_customer` may sort by.
pub const SORTABLE: &[&str] = &["id", "placed_at"];

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    placed_at: DateTime<Utc>,
    customer_id: i32,
    address_id: i32,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    product_id: i32,
    product_name: String,
    quantity: i32,
    unit_price: rust_decimal::Decimal,
    discount: rust_decimal::Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by id with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, placed_at, customer_id, address_id
             FROM customer_order WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Insert an order and its items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the customer, address or a
    /// product doesn't exist, `Database` otherwise.
    pub async fn create(&self, new: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id,) = sqlx::query_as::<_, (i32,)>(
            "INSERT INTO customer_order (customer_id, address_id)
             VALUES ($1, $2)
             RETURNING id",
        )
        .bind(new.customer_id.as_i32())
        .bind(new.address_id.as_i32())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::fk_as_conflict(e, "order references a missing record"))?;

        for item in &new.items {
            sqlx::query(
                "INSERT INTO order_item (order_id, product_id, quantity, unit_price, discount)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(item.product_id.as_i32())
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.discount)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::fk_as_conflict(e, "order references a missing product"))?;
        }

        tx.commit().await?;

        self.get_by_id(OrderId::new(id))
            .await?
            .ok_or_else(|| RepositoryError::DataCorruption("order vanished after insert".into()))
    }

    /// One page of a customer's orders, items included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn find_page_by_customer(
        &self,
        customer_id: CustomerId,
        request: &PageRequest,
    ) -> Result<Page<Order>, RepositoryError> {
        let (total,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM customer_order WHERE customer_id = $1",
        )
        .bind(customer_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        let query = format!(
            "SELECT id, placed_at, customer_id, address_id
             FROM customer_order WHERE customer_id = $1
             {} LIMIT $2 OFFSET $3",
            request.order_clause()
        );
        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .bind(customer_id.as_i32())
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(self.pool)
            .await?;

        let mut content = Vec::with_capacity(rows.len());
        for row in rows {
            content.push(self.hydrate(row).await?);
        }

        Ok(Page::new(content, request, total))
    }

    /// Load line items and convert a row to the domain type.
    async fn hydrate(&self, row: OrderRow) -> Result<Order, RepositoryError> {
        let items = sqlx::query_as::<_, ItemRow>(
            "SELECT i.product_id, p.name AS product_name, i.quantity, i.unit_price, i.discount
             FROM order_item i
             JOIN product p ON p.id = i.product_id
             WHERE i.order_id = $1
             ORDER BY i.product_id",
        )
        .bind(row.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Order {
            id: OrderId::new(row.id),
            placed_at: row.placed_at,
            customer_id: CustomerId::new(row.customer_id),
            address_id: AddressId::new(row.address_id),
            items: items
                .into_iter()
                .map(|i| OrderItem {
                    product_id: ProductId::new(i.product_id),
                    product_name: i.product_name,
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                    discount: i.discount,
                })
                .collect(),
        })
    }
}
