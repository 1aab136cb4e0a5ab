//! Catalog operations: categories and products.
//!
//! Reads are public; writes are restricted to admins at the route layer.

use rust_decimal::Decimal;

use mercado_core::{CategoryId, ProductId};

use crate::db::{categories, products, CategoryRepository, Page, PageRequest, ProductRepository,
    SortDirection};
use crate::error::{AppError, Result};
use crate::models::{Category, NewProduct, Product};
use crate::services::not_found_as;
use crate::state::AppState;

/// Category business operations.
pub struct CategoryService<'a> {
    state: &'a AppState,
}

impl<'a> CategoryService<'a> {
    /// Create a category service over the shared state.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Fetch a category by id.
    ///
    /// # Errors
    ///
    /// `NotFound` for a miss.
    pub async fn find(&self, id: CategoryId) -> Result<Category> {
        self.repo()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "Category",
                id: id.to_string(),
            })
    }

    /// List every category.
    ///
    /// # Errors
    ///
    /// `Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.repo().list().await?)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// `Database` if the insert fails.
    pub async fn insert(&self, name: &str) -> Result<Category> {
        Ok(self.repo().create(name).await?)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// `NotFound` for a miss.
    pub async fn update(&self, id: CategoryId, name: &str) -> Result<()> {
        self.repo()
            .rename(id, name)
            .await
            .map_err(|e| not_found_as(e, "Category", id.to_string()))
    }

    /// Delete a category. Blocked when products reference it.
    ///
    /// # Errors
    ///
    /// `NotFound` for a miss, `DataIntegrity` when products exist.
    pub async fn delete(&self, id: CategoryId) -> Result<()> {
        self.repo()
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, "Category", id.to_string()))
    }

    /// One page of categories.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an unsortable column or out-of-range page size.
    pub async fn find_page(
        &self,
        page: u32,
        page_size: u32,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Page<Category>> {
        let request = PageRequest::new(
            page,
            page_size,
            super::sort_column(order_by),
            direction,
            categories::SORTABLE,
        )
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(self.repo().find_page(&request).await?)
    }

    fn repo(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(self.state.pool())
    }
}

/// Product business operations.
pub struct ProductService<'a> {
    state: &'a AppState,
}

impl<'a> ProductService<'a> {
    /// Create a product service over the shared state.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Fetch a product by id.
    ///
    /// # Errors
    ///
    /// `NotFound` for a miss.
    pub async fn find(&self, id: ProductId) -> Result<Product> {
        self.repo()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "Product",
                id: id.to_string(),
            })
    }

    /// Search by partial name within categories, paginated.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an unsortable column or out-of-range page size.
    pub async fn search(
        &self,
        name: &str,
        category_ids: &[CategoryId],
        page: u32,
        page_size: u32,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Page<Product>> {
        let request = PageRequest::new(
            page,
            page_size,
            super::sort_column(order_by),
            direction,
            products::SORTABLE,
        )
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(self.repo().search(name, category_ids, &request).await?)
    }

    /// Create a product with its category links.
    ///
    /// # Errors
    ///
    /// `DataIntegrity` when a category id doesn't exist.
    pub async fn insert(&self, name: String, price: Decimal, category_ids: Vec<CategoryId>) -> Result<Product> {
        let new = NewProduct {
            name,
            price,
            category_ids,
        };
        Ok(self.repo().create(&new).await?)
    }

    /// Replace a product's fields and category links.
    ///
    /// # Errors
    ///
    /// `NotFound` for a miss, `DataIntegrity` when a category id doesn't
    /// exist.
    pub async fn update(
        &self,
        id: ProductId,
        name: String,
        price: Decimal,
        category_ids: Vec<CategoryId>,
    ) -> Result<()> {
        let new = NewProduct {
            name,
            price,
            category_ids,
        };
        self.repo()
            .update(id, &new)
            .await
            .map_err(|e| not_found_as(e, "Product", id.to_string()))
    }

    /// Delete a product. Blocked when order items reference it.
    ///
    /// # Errors
    ///
    /// `NotFound` for a miss, `DataIntegrity` when order items exist.
    pub async fn delete(&self, id: ProductId) -> Result<()> {
        self.repo()
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, "Product", id.to_string()))
    }

    fn repo(&self) -> ProductRepository<'_> {
        ProductRepository::new(self.state.pool())
    }
}
