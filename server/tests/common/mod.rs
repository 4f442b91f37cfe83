use std::sync::Arc;

use pantry::menu::{MenuItem, MenuItemPayload};
use pantry::restaurant::{Restaurant, RestaurantPayload};
use pantry_server::config::{Config, GatewayConfig, JwtConfig, PaymentsConfig, StoreBackend};
use pantry_server::state::State;
use pantry_server::store::memory::MemoryStore;
use pantry_server::store::DocumentStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub fn test_config() -> Config {
    let gateway = GatewayConfig {
        enabled: true,
        test_mode: true,
        key_id: "test-key".into(),
        key_secret: "test-secret".into(),
        webhook_secret: "test-webhook-secret".into(),
        base_url: "http://127.0.0.1:1".into(),
        qr_expiry_minutes: 15,
    };

    Config {
        port: 0,
        store_backend: StoreBackend::Memory,
        redis_url: String::new(),
        cors_origin: "http://localhost:3000".into(),
        jwt: JwtConfig {
            secret: "integration-test-secret-key".into(),
            issuer: "pantry".into(),
            audience: "pantry-clients".into(),
            token_minutes: 60,
            refresh_days: 7,
        },
        payments: PaymentsConfig {
            razorpay: gateway.clone(),
            paytm: gateway.clone(),
            phonepe: gateway,
        },
    }
}

pub fn test_state() -> (Arc<State>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let handle: Arc<dyn DocumentStore> = store.clone();
    let state = State::with_store(test_config(), handle);
    (state, store)
}

/// One live restaurant with one priced menu item, ready to be ordered from.
pub async fn seed_restaurant_with_item(
    state: &State,
    owner: &str,
    price: Decimal,
    available: bool,
) -> (Restaurant, MenuItem) {
    let restaurant = state
        .restaurants
        .create(
            RestaurantPayload {
                name: "Spice Garden".into(),
                description: "North Indian classics".into(),
                image_url: String::new(),
                image_urls: Vec::new(),
                city: "Bengaluru".into(),
                state: "Karnataka".into(),
                address: "14 MG Road".into(),
                postal_code: "560001".into(),
                latitude: 0.0,
                longitude: 0.0,
                phone_number: String::new(),
                email: String::new(),
                cuisine_types: Vec::new(),
                delivery_fee: dec!(50),
                estimated_delivery_time: 30,
                owner_id: String::new(),
            },
            owner,
        )
        .await
        .expect("restaurant");

    let item = state
        .restaurants
        .create_menu_item(MenuItemPayload {
            restaurant_id: restaurant.id.clone(),
            name: "Paneer Tikka".into(),
            description: String::new(),
            price,
            image_url: String::new(),
            category: "Starters".into(),
            is_vegetarian: true,
            is_vegan: false,
            is_gluten_free: false,
            is_spicy: false,
            spice_level: 0,
            allergens: Vec::new(),
            ingredients: Vec::new(),
            preparation_time: 15,
            is_available: available,
            stock_quantity: 10,
            variants: Vec::new(),
            tags: Vec::new(),
        })
        .await
        .expect("menu item");

    (restaurant, item)
}
