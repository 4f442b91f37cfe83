use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pantry::menu::MenuCategory;
use pantry::restaurant::{Restaurant, RestaurantFilter, RestaurantPayload};
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::policy::{authorize, Operation, Relationship};
use crate::state::State as AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_restaurants).post(create_restaurant))
        .route(
            "/:id",
            get(get_restaurant).put(update_restaurant).delete(delete_restaurant),
        )
        .route("/:id/menu", get(restaurant_menu))
        .route("/mine", get(my_restaurants))
        .route("/seed-menus", post(seed_menus))
}

async fn list_restaurants(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<RestaurantFilter>,
) -> Result<Json<Vec<Restaurant>>, AppError> {
    let restaurants = state.restaurants.list(&filter).await?;
    Ok(Json(restaurants))
}

async fn get_restaurant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Restaurant>, AppError> {
    let restaurant = state.restaurants.get(&id).await?;
    Ok(Json(restaurant))
}

async fn restaurant_menu(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MenuCategory>>, AppError> {
    // 404 for unknown restaurants rather than an empty menu.
    state.restaurants.get(&id).await?;

    let menu = state.restaurants.menu(&id).await?;
    Ok(Json(menu))
}

async fn create_restaurant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<RestaurantPayload>,
) -> Result<(StatusCode, Json<Restaurant>), AppError> {
    authorize(Operation::ManageRestaurant, user.role()?, Relationship::Other)?;

    let restaurant = state.restaurants.create(payload, user.user_id()).await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

async fn update_restaurant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<RestaurantPayload>,
) -> Result<Json<Restaurant>, AppError> {
    authorize(Operation::ManageRestaurant, user.role()?, Relationship::Other)?;

    let restaurant = state.restaurants.update(&id, payload).await?;
    Ok(Json(restaurant))
}

async fn delete_restaurant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(Operation::ManageRestaurant, user.role()?, Relationship::Other)?;

    if !state.restaurants.delete(&id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Json(json!({ "message": "Restaurant deleted" })))
}

async fn my_restaurants(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Restaurant>>, AppError> {
    authorize(Operation::ManageRestaurant, user.role()?, Relationship::Other)?;

    let restaurants = state.restaurants.by_owner(user.user_id()).await?;
    Ok(Json(restaurants))
}

async fn seed_menus(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(Operation::SeedCatalog, user.role()?, Relationship::Other)?;

    let created = state.restaurants.seed(user.user_id()).await?;
    Ok(Json(json!({ "created": created })))
}
