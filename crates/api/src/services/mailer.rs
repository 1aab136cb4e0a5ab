//! Order confirmation notifications.

use async_trait::async_trait;

use crate::models::Order;

/// Sends the confirmation for a freshly placed order. Failures are the
/// implementation's problem to report; order placement never rolls back
/// because a notification didn't go out.
#[async_trait]
pub trait OrderMailer: Send + Sync {
    async fn order_confirmation(&self, order: &Order);
}

/// Logs confirmations instead of sending them. Stands in until a real
/// mail provider is wired up.
pub struct LogMailer;

#[async_trait]
impl OrderMailer for LogMailer {
    async fn order_confirmation(&self, order: &Order) {
        tracing::info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            total = %order.total(),
            items = order.items.len(),
            "order confirmation"
        );
    }
}
