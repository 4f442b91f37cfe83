use std::collections::BTreeMap;

use pantry::menu::{MenuCategory, MenuItem, MenuItemPayload, MenuItemVariant};
use pantry::now;
use pantry::restaurant::{
    CuisineType, Restaurant, RestaurantFilter, RestaurantPayload, RestaurantStatus,
};
use rust_decimal_macros::dec;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::repository::{MenuItemRepository, RestaurantRepository};

#[derive(Clone)]
pub struct RestaurantService {
    restaurants: RestaurantRepository,
    menu: MenuItemRepository,
}

impl RestaurantService {
    pub fn new(restaurants: RestaurantRepository, menu: MenuItemRepository) -> Self {
        Self { restaurants, menu }
    }

    /// Listing shows active restaurants that are approved or still in the
    /// approval queue, filtered and paginated in memory.
    pub async fn list(&self, filter: &RestaurantFilter) -> AppResult<Vec<Restaurant>> {
        let restaurants = self.restaurants.all().await?;

        let mut matching: Vec<Restaurant> = restaurants
            .into_iter()
            .filter(|r| {
                r.is_active
                    && matches!(
                        r.status,
                        RestaurantStatus::Approved | RestaurantStatus::Pending
                    )
            })
            .filter(|r| match &filter.city {
                Some(city) => r.city.eq_ignore_ascii_case(city),
                None => true,
            })
            .filter(|r| match filter.cuisine_type {
                Some(cuisine) => r.cuisine_types.contains(&cuisine),
                None => true,
            })
            .filter(|r| match filter.min_rating {
                Some(min) => r.rating >= min,
                None => true,
            })
            .filter(|r| match &filter.search_term {
                Some(term) => {
                    let term = term.to_lowercase();
                    r.name.to_lowercase().contains(&term)
                        || r.description.to_lowercase().contains(&term)
                }
                None => true,
            })
            .collect();

        matching.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));

        let skip = ((filter.page() - 1) * filter.page_size()) as usize;
        Ok(matching
            .into_iter()
            .skip(skip)
            .take(filter.page_size() as usize)
            .collect())
    }

    pub async fn get(&self, id: &str) -> AppResult<Restaurant> {
        self.restaurants
            .get(id)
            .await?
            .filter(|r| r.is_active && !r.is_deleted)
            .ok_or(AppError::NotFound)
    }

    pub async fn create(&self, mut payload: RestaurantPayload, caller_id: &str) -> AppResult<Restaurant> {
        info!("Creating restaurant {}", payload.name);

        if payload.owner_id.is_empty() {
            payload.owner_id = caller_id.to_string();
        }
        let restaurant = Restaurant::from_payload(payload);
        self.restaurants.create(&restaurant).await?;
        Ok(restaurant)
    }

    /// Content update; rating, approval status and audit identity stay
    /// server-owned.
    pub async fn update(&self, id: &str, payload: RestaurantPayload) -> AppResult<Restaurant> {
        info!("Updating restaurant {id}");

        let mut restaurant = self.restaurants.get(id).await?.ok_or(AppError::NotFound)?;

        restaurant.name = payload.name;
        restaurant.description = payload.description;
        restaurant.image_url = payload.image_url;
        restaurant.image_urls = payload.image_urls;
        restaurant.city = payload.city;
        restaurant.state = payload.state;
        restaurant.address = payload.address;
        restaurant.postal_code = payload.postal_code;
        restaurant.latitude = payload.latitude;
        restaurant.longitude = payload.longitude;
        restaurant.phone_number = payload.phone_number;
        restaurant.email = payload.email;
        restaurant.cuisine_types = payload.cuisine_types;
        restaurant.delivery_fee = payload.delivery_fee;
        restaurant.estimated_delivery_time = payload.estimated_delivery_time;
        restaurant.updated_at = now();

        self.restaurants.update(&restaurant).await?;
        Ok(restaurant)
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let Some(mut restaurant) = self.restaurants.get(id).await? else {
            return Ok(false);
        };

        restaurant.is_deleted = true;
        restaurant.updated_at = now();
        self.restaurants.update(&restaurant).await?;
        Ok(true)
    }

    pub async fn by_owner(&self, owner_id: &str) -> AppResult<Vec<Restaurant>> {
        Ok(self.restaurants.by_owner(owner_id).await?)
    }

    /// A restaurant's menu grouped by category for display.
    pub async fn menu(&self, restaurant_id: &str) -> AppResult<Vec<MenuCategory>> {
        let items = self.menu.by_restaurant(restaurant_id).await?;

        let mut grouped: BTreeMap<String, Vec<MenuItem>> = BTreeMap::new();
        for item in items {
            grouped.entry(item.category.clone()).or_default().push(item);
        }

        Ok(grouped
            .into_iter()
            .map(|(category, items)| MenuCategory { category, items })
            .collect())
    }

    pub async fn menu_item(&self, id: &str) -> AppResult<MenuItem> {
        self.menu
            .get(id)
            .await?
            .filter(|item| !item.is_deleted)
            .ok_or(AppError::NotFound)
    }

    pub async fn create_menu_item(&self, payload: MenuItemPayload) -> AppResult<MenuItem> {
        // The target restaurant must exist and be live.
        self.get(&payload.restaurant_id).await?;

        let item = MenuItem::from_payload(payload);
        self.menu.create(&item).await?;
        Ok(item)
    }

    pub async fn update_menu_item(&self, id: &str, payload: MenuItemPayload) -> AppResult<MenuItem> {
        let mut item = self
            .menu
            .get(id)
            .await?
            .filter(|item| !item.is_deleted)
            .ok_or(AppError::NotFound)?;

        item.name = payload.name;
        item.description = payload.description;
        item.price = payload.price;
        item.image_url = payload.image_url;
        item.category = payload.category;
        item.is_vegetarian = payload.is_vegetarian;
        item.is_vegan = payload.is_vegan;
        item.is_gluten_free = payload.is_gluten_free;
        item.is_spicy = payload.is_spicy;
        item.spice_level = payload.spice_level;
        item.allergens = payload.allergens;
        item.ingredients = payload.ingredients;
        item.preparation_time = payload.preparation_time;
        item.is_available = payload.is_available;
        item.stock_quantity = payload.stock_quantity;
        item.variants = payload.variants;
        item.tags = payload.tags;
        item.updated_at = now();

        self.menu.update(&item).await?;
        Ok(item)
    }

    pub async fn delete_menu_item(&self, id: &str) -> AppResult<bool> {
        Ok(self.menu.soft_delete(id).await?)
    }

    /// Loads a small demo catalog. Idempotent per deployment: does nothing
    /// once any restaurant exists.
    pub async fn seed(&self, owner_id: &str) -> AppResult<u32> {
        if !self.restaurants.all().await?.is_empty() {
            info!("Catalog already populated, skipping seed");
            return Ok(0);
        }

        let mut created = 0;
        for (restaurant, menu_items) in demo_catalog(owner_id) {
            self.restaurants.create(&restaurant).await?;
            created += 1;
            for item in menu_items {
                self.menu.create(&item).await?;
                created += 1;
            }
        }

        info!("Seeded {created} catalog documents");
        Ok(created)
    }
}

fn demo_catalog(owner_id: &str) -> Vec<(Restaurant, Vec<MenuItem>)> {
    let mut spice_garden = Restaurant::from_payload(RestaurantPayload {
        name: "Spice Garden".into(),
        description: "North Indian classics, wood-fired breads".into(),
        image_url: String::new(),
        image_urls: Vec::new(),
        city: "Bengaluru".into(),
        state: "Karnataka".into(),
        address: "14 MG Road".into(),
        postal_code: "560001".into(),
        latitude: 12.9758,
        longitude: 77.6045,
        phone_number: "+91 80 4000 1111".into(),
        email: "hello@spicegarden.example".into(),
        cuisine_types: vec![CuisineType::Indian],
        delivery_fee: dec!(50),
        estimated_delivery_time: 35,
        owner_id: owner_id.to_string(),
    });
    spice_garden.status = RestaurantStatus::Approved;
    spice_garden.rating = 4.4;
    spice_garden.review_count = 212;

    let spice_garden_menu = vec![
        menu_item(&spice_garden.id, "Paneer Tikka", "Starters", dec!(100), true, 3),
        menu_item(&spice_garden.id, "Butter Chicken", "Mains", dec!(260), false, 2),
        menu_item(&spice_garden.id, "Garlic Naan", "Breads", dec!(60), true, 0),
    ];

    let mut wok_house = Restaurant::from_payload(RestaurantPayload {
        name: "Wok House".into(),
        description: "Indo-Chinese, extra heat on request".into(),
        image_url: String::new(),
        image_urls: Vec::new(),
        city: "Bengaluru".into(),
        state: "Karnataka".into(),
        address: "3 Church Street".into(),
        postal_code: "560001".into(),
        latitude: 12.9752,
        longitude: 77.6033,
        phone_number: "+91 80 4000 2222".into(),
        email: "orders@wokhouse.example".into(),
        cuisine_types: vec![CuisineType::Chinese],
        delivery_fee: dec!(50),
        estimated_delivery_time: 30,
        owner_id: owner_id.to_string(),
    });
    wok_house.status = RestaurantStatus::Approved;
    wok_house.rating = 4.1;
    wok_house.review_count = 98;

    let wok_house_menu = vec![
        menu_item(&wok_house.id, "Veg Hakka Noodles", "Noodles", dec!(140), true, 1),
        menu_item(&wok_house.id, "Chilli Chicken", "Mains", dec!(220), false, 4),
    ];

    vec![
        (spice_garden, spice_garden_menu),
        (wok_house, wok_house_menu),
    ]
}

fn menu_item(
    restaurant_id: &str,
    name: &str,
    category: &str,
    price: rust_decimal::Decimal,
    vegetarian: bool,
    spice_level: u8,
) -> MenuItem {
    MenuItem::from_payload(MenuItemPayload {
        restaurant_id: restaurant_id.to_string(),
        name: name.to_string(),
        description: String::new(),
        price,
        image_url: String::new(),
        category: category.to_string(),
        is_vegetarian: vegetarian,
        is_vegan: false,
        is_gluten_free: false,
        is_spicy: spice_level > 2,
        spice_level,
        allergens: Vec::new(),
        ingredients: Vec::new(),
        preparation_time: 15,
        is_available: true,
        stock_quantity: 0,
        variants: vec![MenuItemVariant {
            name: "Regular".into(),
            price_modifier: rust_decimal::Decimal::ZERO,
            is_default: true,
        }],
        tags: Vec::new(),
    })
}
