use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};
use pantry::order::Order;
use pantry::user::{Address, UpdateProfileRequest, UserProfile};
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::policy::{authorize, Operation, Relationship};
use crate::state::State as AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(profile).put(update_profile))
        .route("/address", put(update_address))
        .route("/orders", get(order_history))
}

async fn profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    authorize(Operation::ManageOwnProfile, user.role()?, Relationship::Owner)?;

    let profile = state.users.profile(user.user_id()).await?;
    Ok(Json(profile))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    authorize(Operation::ManageOwnProfile, user.role()?, Relationship::Owner)?;

    let profile = state.users.update_profile(user.user_id(), request).await?;
    Ok(Json(profile))
}

async fn update_address(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(address): Json<Address>,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(Operation::ManageOwnProfile, user.role()?, Relationship::Owner)?;

    if !state.users.update_address(user.user_id(), address).await? {
        return Err(AppError::NotFound);
    }
    Ok(Json(json!({ "message": "Address updated" })))
}

async fn order_history(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Order>>, AppError> {
    authorize(Operation::ListOrdersByUser, user.role()?, Relationship::Owner)?;

    let orders = state.users.order_history(user.user_id()).await?;
    Ok(Json(orders))
}
