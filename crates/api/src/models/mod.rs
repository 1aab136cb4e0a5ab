//! Domain types.
//!
//! These represent validated domain objects, separate from database row
//! types (mapped in `db`) and from the wire DTOs (in `dto`).

pub mod catalog;
pub mod customer;
pub mod order;

pub use catalog::{Category, NewProduct, Product};
pub use customer::{Address, City, Customer, NewAddress, NewCustomer};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
