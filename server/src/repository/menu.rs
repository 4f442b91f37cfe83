use std::sync::Arc;

use pantry::menu::MenuItem;
use pantry::now;

use crate::store::{Collection, DocumentStore, StoreResult};

/// Menu items are partitioned by restaurant id, so a restaurant's menu is
/// one partition read.
#[derive(Clone)]
pub struct MenuItemRepository {
    items: Collection<MenuItem>,
}

impl MenuItemRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            items: Collection::new(store),
        }
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        self.items.get(id).await
    }

    pub async fn by_restaurant(&self, restaurant_id: &str) -> StoreResult<Vec<MenuItem>> {
        let items = self.items.list_partition(restaurant_id).await?;
        Ok(items.into_iter().filter(|i| !i.is_deleted).collect())
    }

    pub async fn create(&self, item: &MenuItem) -> StoreResult<()> {
        self.items.create(item).await
    }

    pub async fn update(&self, item: &MenuItem) -> StoreResult<()> {
        self.items.upsert(item).await
    }

    pub async fn soft_delete(&self, id: &str) -> StoreResult<bool> {
        let Some(mut item) = self.items.get(id).await? else {
            return Ok(false);
        };
        item.is_deleted = true;
        item.updated_at = now();
        self.items.upsert(&item).await?;
        Ok(true)
    }
}
