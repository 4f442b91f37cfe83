use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use pantry::user::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::State as AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = state.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state.auth.login(request).await?;
    Ok(Json(response))
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state.auth.refresh(&request.refresh_token).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    state.auth.logout(user.user_id()).await?;
    Ok(Json(json!({ "message": "Logged out" })))
}
