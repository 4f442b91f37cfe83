//! # Pantry server
//!
//! REST backend for a two-sided food-ordering platform: registration and
//! login, restaurant and menu listing, order placement with an append-only
//! status history, and payment-provider dispatch. State is built once in
//! [`state::State::new`] and shared behind an `Arc`; every request handler
//! is stateless beyond that.
//!
//! ```sh
//! RUST_LOG=info cargo run
//! ```
//!
//! `STORE_BACKEND=memory` runs without redis for local development.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod payments;
pub mod policy;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let origin = state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .expect("Invalid CORS_ORIGIN");
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let app = routes::router(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
