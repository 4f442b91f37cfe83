//! HTTP surface. Handlers translate between transport and services: they
//! extract the caller, run the central policy check, call one service
//! method and serialize the result. No business rules live here.

pub mod auth;
pub mod health;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod restaurants;
pub mod users;

use std::sync::Arc;

use axum::Router;

use crate::state::State;

pub fn router(state: Arc<State>) -> Router {
    Router::new()
        .nest("/api/auth", auth::routes())
        .nest("/api/users", users::routes())
        .nest("/api/restaurants", restaurants::routes())
        .nest("/api/menu", menu::routes())
        .nest("/api/orders", orders::routes())
        .nest("/api/payments", payments::routes())
        .nest("/health", health::routes())
        .with_state(state)
}
