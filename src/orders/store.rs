use crate::orders::model::{Order, User};
use crate::payments::error::PaymentResult;
use async_trait::async_trait;

/// Persistence owned by the host platform. Checkout mutates an order in
/// memory and then hands it back through these calls.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_order(&self, order_id: u64) -> PaymentResult<Option<Order>>;

    async fn find_user(&self, user_id: u64) -> PaymentResult<Option<User>>;

    /// Persist every field of `order`.
    async fn update_order(&self, order: &Order) -> PaymentResult<()>;

    async fn delete_order(&self, order_id: u64) -> PaymentResult<()>;

    /// Platform hook run once a payment is confirmed (activates whatever the
    /// order bought). May mutate the order; caller persists afterwards.
    async fn finish_processing(&self, order: &mut Order) -> PaymentResult<()>;
}
