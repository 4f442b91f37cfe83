use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pantry::menu::{MenuItem, MenuItemPayload};
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::policy::{authorize, Operation, Relationship};
use crate::state::State as AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_menu_item))
        .route(
            "/:id",
            get(get_menu_item).put(update_menu_item).delete(delete_menu_item),
        )
        .route("/restaurant/:restaurant_id", get(menu_by_restaurant))
}

async fn get_menu_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MenuItem>, AppError> {
    let item = state.restaurants.menu_item(&id).await?;
    Ok(Json(item))
}

async fn menu_by_restaurant(
    State(state): State<Arc<AppState>>,
    Path(restaurant_id): Path<String>,
) -> Result<Json<Vec<MenuItem>>, AppError> {
    let categories = state.restaurants.menu(&restaurant_id).await?;
    let items = categories.into_iter().flat_map(|c| c.items).collect();
    Ok(Json(items))
}

async fn create_menu_item(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<MenuItemPayload>,
) -> Result<(StatusCode, Json<MenuItem>), AppError> {
    authorize(Operation::ManageMenu, user.role()?, Relationship::Other)?;

    let item = state.restaurants.create_menu_item(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_menu_item(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemPayload>,
) -> Result<Json<MenuItem>, AppError> {
    authorize(Operation::ManageMenu, user.role()?, Relationship::Other)?;

    let item = state.restaurants.update_menu_item(&id, payload).await?;
    Ok(Json(item))
}

async fn delete_menu_item(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(Operation::ManageMenu, user.role()?, Relationship::Other)?;

    if !state.restaurants.delete_menu_item(&id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Json(json!({ "message": "Menu item deleted" })))
}
