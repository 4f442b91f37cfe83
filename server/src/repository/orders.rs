use std::sync::Arc;

use pantry::order::Order;
use pantry::now;

use crate::store::{Collection, DocumentStore, StoreResult};

/// Orders are partitioned by owning user id, so `by_user` is a single
/// partition read while `by_restaurant` is a cross-partition scan.
#[derive(Clone)]
pub struct OrderRepository {
    orders: Collection<Order>,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            orders: Collection::new(store),
        }
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        self.orders.get(id).await
    }

    pub async fn by_user(&self, user_id: &str) -> StoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .list_partition(user_id)
            .await?
            .into_iter()
            .filter(|o| !o.is_deleted)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    pub async fn by_restaurant(&self, restaurant_id: &str) -> StoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .scan()
            .await?
            .into_iter()
            .filter(|o| o.restaurant_id == restaurant_id && !o.is_deleted)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    pub async fn create(&self, order: &Order) -> StoreResult<()> {
        self.orders.create(order).await
    }

    pub async fn update(&self, order: &Order) -> StoreResult<()> {
        self.orders.upsert(order).await
    }

    pub async fn soft_delete(&self, id: &str) -> StoreResult<bool> {
        let Some(mut order) = self.orders.get(id).await? else {
            return Ok(false);
        };
        order.is_deleted = true;
        order.updated_at = now();
        self.orders.upsert(&order).await?;
        Ok(true)
    }

    pub async fn hard_delete(&self, user_id: &str, id: &str) -> StoreResult<bool> {
        self.orders.delete(user_id, id).await
    }
}
