use std::sync::Arc;

use pantry::restaurant::Restaurant;

use crate::store::{Collection, DocumentStore, StoreResult};

/// Restaurants are partitioned by city.
#[derive(Clone)]
pub struct RestaurantRepository {
    restaurants: Collection<Restaurant>,
}

impl RestaurantRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            restaurants: Collection::new(store),
        }
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Restaurant>> {
        self.restaurants.get(id).await
    }

    pub async fn all(&self) -> StoreResult<Vec<Restaurant>> {
        let restaurants = self.restaurants.scan().await?;
        Ok(restaurants.into_iter().filter(|r| !r.is_deleted).collect())
    }

    pub async fn by_owner(&self, owner_id: &str) -> StoreResult<Vec<Restaurant>> {
        let restaurants = self.restaurants.scan().await?;
        Ok(restaurants
            .into_iter()
            .filter(|r| r.owner_id == owner_id && !r.is_deleted)
            .collect())
    }

    pub async fn create(&self, restaurant: &Restaurant) -> StoreResult<()> {
        self.restaurants.create(restaurant).await
    }

    pub async fn update(&self, restaurant: &Restaurant) -> StoreResult<()> {
        self.restaurants.upsert(restaurant).await
    }
}
