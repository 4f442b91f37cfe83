use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use pantry::order::{CreateOrderRequest, Order, UpdateOrderStatusRequest};
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::policy::{authorize, Operation, Relationship};
use crate::state::State as AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_order))
        .route("/:id", get(get_order))
        .route("/user/:user_id", get(orders_by_user))
        .route("/restaurant/:restaurant_id", get(orders_by_restaurant))
        .route("/:id/status", put(update_order_status))
        .route("/:id/cancel", post(cancel_order))
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    authorize(Operation::CreateOrder, user.role()?, Relationship::Owner)?;

    let order = state.orders.create(request, user.user_id()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = state.orders.get(&id).await?;

    let relationship = if order.user_id == user.user_id() {
        Relationship::Owner
    } else {
        Relationship::Other
    };
    authorize(Operation::ViewOrder, user.role()?, relationship)?;

    Ok(Json(order))
}

async fn orders_by_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Order>>, AppError> {
    let relationship = if user_id == user.user_id() {
        Relationship::Owner
    } else {
        Relationship::Other
    };
    authorize(Operation::ListOrdersByUser, user.role()?, relationship)?;

    let orders = state.orders.list_by_user(&user_id).await?;
    Ok(Json(orders))
}

async fn orders_by_restaurant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(restaurant_id): Path<String>,
) -> Result<Json<Vec<Order>>, AppError> {
    authorize(
        Operation::ListOrdersByRestaurant,
        user.role()?,
        Relationship::Other,
    )?;

    let orders = state.orders.list_by_restaurant(&restaurant_id).await?;
    Ok(Json(orders))
}

async fn update_order_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<Order>, AppError> {
    authorize(Operation::UpdateOrderStatus, user.role()?, Relationship::Other)?;

    let order = state
        .orders
        .update_status(&id, request, user.user_id())
        .await?;
    Ok(Json(order))
}

async fn cancel_order(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(Operation::CancelOrder, user.role()?, Relationship::Owner)?;

    if !state.orders.cancel(&id, user.user_id()).await? {
        return Err(AppError::Validation("Unable to cancel order".into()));
    }
    Ok(Json(json!({ "message": "Order cancelled successfully" })))
}
