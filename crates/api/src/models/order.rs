//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use mercado_core::{AddressId, CustomerId, OrderId, ProductId};

/// A placed order with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(rename = "instante")]
    pub placed_at: DateTime<Utc>,
    #[serde(rename = "clienteId")]
    pub customer_id: CustomerId,
    #[serde(rename = "enderecoId")]
    pub address_id: AddressId,
    #[serde(rename = "itens")]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of the line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// One line of an order. Unit price and discount are captured at placement
/// time so later catalog changes do not rewrite history.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    #[serde(rename = "produtoId")]
    pub product_id: ProductId,
    #[serde(rename = "produto")]
    pub product_name: String,
    #[serde(rename = "quantidade")]
    pub quantity: i32,
    #[serde(rename = "preco")]
    pub unit_price: Decimal,
    #[serde(rename = "desconto")]
    pub discount: Decimal,
}

impl OrderItem {
    /// `(unit_price - discount) * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        (self.unit_price - self.discount) * Decimal::from(self.quantity)
    }
}

/// An order to insert; unit prices are resolved from the catalog by the
/// service, never trusted from the client.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub address_id: AddressId,
    pub items: Vec<NewOrderItem>,
}

/// A line of an order to insert.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_line_total_applies_discount_and_quantity() {
        let item = OrderItem {
            product_id: ProductId::new(1),
            product_name: "TV true color".to_string(),
            quantity: 2,
            unit_price: dec("2000.00"),
            discount: dec("100.00"),
        };
        assert_eq!(item.line_total(), dec("3800.00"));
    }

    #[test]
    fn test_order_total_sums_lines() {
        let order = Order {
            id: OrderId::new(1),
            placed_at: Utc::now(),
            customer_id: CustomerId::new(1),
            address_id: AddressId::new(1),
            items: vec![
                OrderItem {
                    product_id: ProductId::new(1),
                    product_name: "Computador".to_string(),
                    quantity: 1,
                    unit_price: dec("2000.00"),
                    discount: Decimal::ZERO,
                },
                OrderItem {
                    product_id: ProductId::new(3),
                    product_name: "Mouse".to_string(),
                    quantity: 2,
                    unit_price: dec("80.00"),
                    discount: dec("10.00"),
                },
            ],
        };
        assert_eq!(order.total(), dec("2140.00"));
    }
}
