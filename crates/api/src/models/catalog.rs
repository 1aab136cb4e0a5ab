//! Catalog domain types: categories and products.

use rust_decimal::Decimal;
use serde::Serialize;

use mercado_core::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "nome")]
    pub name: String,
}

/// A product with the categories it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub price: Decimal,
    #[serde(rename = "categorias")]
    pub categories: Vec<Category>,
}

/// A product to insert (id assigned by persistence).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category_ids: Vec<CategoryId>,
}
