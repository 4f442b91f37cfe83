use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{new_id, now};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub category: String,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_spicy: bool,
    pub spice_level: u8,
    pub allergens: Vec<String>,
    pub ingredients: Vec<String>,
    /// Preparation time in minutes.
    pub preparation_time: u32,
    pub is_available: bool,
    pub stock_quantity: u32,
    pub variants: Vec<MenuItemVariant>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl MenuItem {
    pub fn from_payload(payload: MenuItemPayload) -> Self {
        let created = now();
        Self {
            id: new_id(),
            restaurant_id: payload.restaurant_id,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            image_url: payload.image_url,
            category: payload.category,
            is_vegetarian: payload.is_vegetarian,
            is_vegan: payload.is_vegan,
            is_gluten_free: payload.is_gluten_free,
            is_spicy: payload.is_spicy,
            spice_level: payload.spice_level,
            allergens: payload.allergens,
            ingredients: payload.ingredients,
            preparation_time: payload.preparation_time,
            is_available: payload.is_available,
            stock_quantity: payload.stock_quantity,
            variants: payload.variants,
            tags: payload.tags,
            created_at: created,
            updated_at: created,
            is_deleted: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemVariant {
    pub name: String,
    pub price_modifier: Decimal,
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPayload {
    pub restaurant_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_spicy: bool,
    #[serde(default)]
    pub spice_level: u8,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default = "default_preparation_minutes")]
    pub preparation_time: u32,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub variants: Vec<MenuItemVariant>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_preparation_minutes() -> u32 {
    15
}

fn default_available() -> bool {
    true
}

/// Menu grouped for display, one entry per category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub category: String,
    pub items: Vec<MenuItem>,
}
