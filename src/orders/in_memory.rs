use crate::orders::model::{Order, User};
use crate::orders::store::OrderStore;
use crate::payments::error::{PaymentError, PaymentResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory order and user store.
///
/// Stands in for the platform database in tests and local runs.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<u64, Order>>>,
    users: Arc<RwLock<HashMap<u64, User>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_order(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_order(&self, order_id: u64) -> PaymentResult<Option<Order>> {
        Ok(self.orders.read().await.get(&order_id).cloned())
    }

    async fn find_user(&self, user_id: u64) -> PaymentResult<Option<User>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn update_order(&self, order: &Order) -> PaymentResult<()> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(&order.id) {
            Some(stored) => {
                *stored = order.clone();
                Ok(())
            }
            None => Err(PaymentError::StoreError {
                message: format!("order {} no longer exists", order.id),
            }),
        }
    }

    async fn delete_order(&self, order_id: u64) -> PaymentResult<()> {
        self.orders.write().await.remove(&order_id);
        Ok(())
    }

    async fn finish_processing(&self, order: &mut Order) -> PaymentResult<()> {
        order.processed_at = Some(Utc::now());
        Ok(())
    }
}
