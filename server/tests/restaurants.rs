//! Restaurant listing filters, menu grouping and catalog seeding.

mod common;

use common::{seed_restaurant_with_item, test_state};
use pantry::restaurant::{CuisineType, RestaurantFilter, RestaurantPayload};
use pantry_server::error::AppError;
use rust_decimal_macros::dec;

fn payload(name: &str, city: &str, cuisine: CuisineType) -> RestaurantPayload {
    RestaurantPayload {
        name: name.into(),
        description: format!("{name} kitchen"),
        image_url: String::new(),
        image_urls: Vec::new(),
        city: city.into(),
        state: String::new(),
        address: String::new(),
        postal_code: String::new(),
        latitude: 0.0,
        longitude: 0.0,
        phone_number: String::new(),
        email: String::new(),
        cuisine_types: vec![cuisine],
        delivery_fee: dec!(50),
        estimated_delivery_time: 30,
        owner_id: String::new(),
    }
}

#[tokio::test]
async fn listing_filters_by_city_cuisine_and_search_term() {
    let (state, _) = test_state();

    state
        .restaurants
        .create(payload("Spice Garden", "Bengaluru", CuisineType::Indian), "v1")
        .await
        .unwrap();
    state
        .restaurants
        .create(payload("Wok House", "Bengaluru", CuisineType::Chinese), "v1")
        .await
        .unwrap();
    state
        .restaurants
        .create(payload("Trattoria", "Mumbai", CuisineType::Italian), "v2")
        .await
        .unwrap();

    let bengaluru = state
        .restaurants
        .list(&RestaurantFilter {
            city: Some("bengaluru".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(bengaluru.len(), 2);

    let chinese = state
        .restaurants
        .list(&RestaurantFilter {
            cuisine_type: Some(CuisineType::Chinese),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(chinese.len(), 1);
    assert_eq!(chinese[0].name, "Wok House");

    let searched = state
        .restaurants
        .list(&RestaurantFilter {
            search_term: Some("trattoria".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].city, "Mumbai");

    let paged = state
        .restaurants
        .list(&RestaurantFilter {
            page: Some(1),
            page_size: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(paged.len(), 2);
}

#[tokio::test]
async fn deleted_restaurants_disappear_from_reads() {
    let (state, _) = test_state();
    let (restaurant, _) = seed_restaurant_with_item(&state, "v1", dec!(100), true).await;

    assert!(state.restaurants.delete(&restaurant.id).await.unwrap());
    assert!(matches!(
        state.restaurants.get(&restaurant.id).await,
        Err(AppError::NotFound)
    ));
    assert!(state
        .restaurants
        .list(&RestaurantFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn menu_is_grouped_by_category_and_hides_deleted_items() {
    let (state, _) = test_state();
    let (restaurant, item) = seed_restaurant_with_item(&state, "v1", dec!(100), true).await;

    let menu = state.restaurants.menu(&restaurant.id).await.unwrap();
    assert_eq!(menu.len(), 1);
    assert_eq!(menu[0].category, "Starters");
    assert_eq!(menu[0].items.len(), 1);

    assert!(state.restaurants.delete_menu_item(&item.id).await.unwrap());
    let menu = state.restaurants.menu(&restaurant.id).await.unwrap();
    assert!(menu.is_empty());

    assert!(matches!(
        state.restaurants.menu_item(&item.id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn menu_items_require_a_live_restaurant() {
    let (state, _) = test_state();

    let (restaurant, _) = seed_restaurant_with_item(&state, "v1", dec!(100), true).await;
    state.restaurants.delete(&restaurant.id).await.unwrap();

    let result = state
        .restaurants
        .create_menu_item(pantry::menu::MenuItemPayload {
            restaurant_id: restaurant.id.clone(),
            name: "Late Addition".into(),
            description: String::new(),
            price: dec!(80),
            image_url: String::new(),
            category: "Starters".into(),
            is_vegetarian: true,
            is_vegan: false,
            is_gluten_free: false,
            is_spicy: false,
            spice_level: 0,
            allergens: Vec::new(),
            ingredients: Vec::new(),
            preparation_time: 10,
            is_available: true,
            stock_quantity: 0,
            variants: Vec::new(),
            tags: Vec::new(),
        })
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn seed_populates_once() {
    let (state, _) = test_state();

    let created = state.restaurants.seed("admin-1").await.unwrap();
    assert!(created > 0);

    let listed = state
        .restaurants
        .list(&RestaurantFilter::default())
        .await
        .unwrap();
    assert!(!listed.is_empty());

    // Second run is a no-op.
    assert_eq!(state.restaurants.seed("admin-1").await.unwrap(), 0);
}
