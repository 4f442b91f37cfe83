use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{new_id, now};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CuisineType {
    Indian,
    Chinese,
    Italian,
    Mexican,
    Thai,
    Japanese,
    American,
    Continental,
    Desserts,
    Beverages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestaurantStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub image_urls: Vec<String>,
    pub city: String,
    pub state: String,
    pub address: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone_number: String,
    pub email: String,
    pub cuisine_types: Vec<CuisineType>,
    pub rating: f64,
    pub review_count: u32,
    pub delivery_fee: Decimal,
    /// Estimated delivery time in minutes.
    pub estimated_delivery_time: u32,
    pub is_active: bool,
    pub owner_id: String,
    pub status: RestaurantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl Restaurant {
    /// New restaurants always enter the approval queue as Pending.
    pub fn from_payload(payload: RestaurantPayload) -> Self {
        let created = now();
        Self {
            id: new_id(),
            name: payload.name,
            description: payload.description,
            image_url: payload.image_url,
            image_urls: payload.image_urls,
            city: payload.city,
            state: payload.state,
            address: payload.address,
            postal_code: payload.postal_code,
            latitude: payload.latitude,
            longitude: payload.longitude,
            phone_number: payload.phone_number,
            email: payload.email,
            cuisine_types: payload.cuisine_types,
            rating: 0.0,
            review_count: 0,
            delivery_fee: payload.delivery_fee,
            estimated_delivery_time: payload.estimated_delivery_time,
            is_active: true,
            owner_id: payload.owner_id,
            status: RestaurantStatus::Pending,
            created_at: created,
            updated_at: created,
            is_deleted: false,
        }
    }
}

/// Client-supplied restaurant content. Identity, audit fields, rating and
/// approval status are owned by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cuisine_types: Vec<CuisineType>,
    #[serde(default)]
    pub delivery_fee: Decimal,
    #[serde(default = "default_delivery_minutes")]
    pub estimated_delivery_time: u32,
    #[serde(default)]
    pub owner_id: String,
}

fn default_delivery_minutes() -> u32 {
    30
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantFilter {
    pub city: Option<String>,
    pub cuisine_type: Option<CuisineType>,
    pub min_rating: Option<f64>,
    pub search_term: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl RestaurantFilter {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(20).clamp(1, 100)
    }
}
