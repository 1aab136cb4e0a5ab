//! Order placement and retrieval.

use rust_decimal::Decimal;

use mercado_core::{AddressId, OrderId, ProductId};

use crate::auth::{authorize_owner, Principal};
use crate::db::{orders, CustomerRepository, OrderRepository, Page, PageRequest,
    ProductRepository, SortDirection};
use crate::dto::OrderPayload;
use crate::error::{AppError, FieldMessage, Result};
use crate::models::{NewOrder, NewOrderItem, Order};
use crate::state::AppState;

/// Order business operations.
pub struct OrderService<'a> {
    state: &'a AppState,
}

impl<'a> OrderService<'a> {
    /// Create an order service over the shared state.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Fetch an order by id. Only the owning customer or an admin may see
    /// it.
    ///
    /// # Errors
    ///
    /// `NotFound` for a miss, `Forbidden` for non-owners.
    pub async fn find(&self, principal: Option<&Principal>, id: OrderId) -> Result<Order> {
        let order = self
            .repo()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "Order",
                id: id.to_string(),
            })?;

        authorize_owner(principal, order.customer_id)?;
        Ok(order)
    }

    /// Place an order for the authenticated customer.
    ///
    /// Unit prices come from the catalog at placement time; client-supplied
    /// prices are never trusted. The delivery address must belong to the
    /// ordering customer.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty or malformed item list, `Forbidden` for a
    /// foreign address, `NotFound` for a missing product.
    pub async fn place(&self, principal: &Principal, payload: OrderPayload) -> Result<Order> {
        let mut errors = Vec::new();
        if payload.items.is_empty() {
            errors.push(FieldMessage::new("itens", "order must have at least one item"));
        }
        let mut seen = std::collections::HashSet::new();
        for item in &payload.items {
            if item.quantity <= 0 {
                errors.push(FieldMessage::new(
                    "quantidade",
                    format!("quantity must be positive (product {})", item.product_id),
                ));
            }
            // One line per product; quantities aggregate client-side
            if !seen.insert(item.product_id) {
                errors.push(FieldMessage::new(
                    "produtoId",
                    format!("product {} appears more than once", item.product_id),
                ));
            }
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let address_id = AddressId::new(payload.address_id);
        self.check_address_ownership(principal, address_id).await?;

        let products = ProductRepository::new(self.state.pool());
        let mut items = Vec::with_capacity(payload.items.len());
        for item in &payload.items {
            let product_id = ProductId::new(item.product_id);
            let product = products
                .get_by_id(product_id)
                .await?
                .ok_or_else(|| AppError::NotFound {
                    entity: "Product",
                    id: product_id.to_string(),
                })?;

            items.push(NewOrderItem {
                product_id,
                quantity: item.quantity,
                unit_price: product.price,
                discount: Decimal::ZERO,
            });
        }

        let order = self
            .repo()
            .create(&NewOrder {
                customer_id: principal.id,
                address_id,
                items,
            })
            .await?;

        self.state.mailer().order_confirmation(&order).await;
        Ok(order)
    }

    /// One page of the authenticated customer's own orders.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an unsortable column or out-of-range page size.
    pub async fn find_page(
        &self,
        principal: &Principal,
        page: u32,
        page_size: u32,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Page<Order>> {
        let request = PageRequest::new(
            page,
            page_size,
            super::sort_column(order_by),
            direction,
            orders::SORTABLE,
        )
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(self
            .repo()
            .find_page_by_customer(principal.id, &request)
            .await?)
    }

    /// The delivery address must be one of the ordering customer's own.
    async fn check_address_ownership(
        &self,
        principal: &Principal,
        address_id: AddressId,
    ) -> Result<()> {
        let customer = CustomerRepository::new(self.state.pool())
            .get_by_id(principal.id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "Customer",
                id: principal.id.to_string(),
            })?;

        if customer.addresses.iter().any(|a| a.id == address_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    fn repo(&self) -> OrderRepository<'_> {
        OrderRepository::new(self.state.pool())
    }
}
