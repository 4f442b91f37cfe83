use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use pantry::payment::{
    PaymentProvider, PaymentRequest, PaymentResponse, RefundRequest, UpiQrRequest,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::policy::{authorize, Operation, Relationship};
use crate::state::State as AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(create_payment))
        .route("/upi-qr", post(generate_upi_qr))
        .route("/status/:payment_id", get(payment_status))
        .route("/refund", post(refund))
        .route("/providers", get(enabled_providers))
        .route("/webhook/:provider", post(webhook))
}

async fn create_payment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    authorize(Operation::CreatePayment, user.role()?, Relationship::Other)?;

    let gateway = state.payments.gateway(request.provider)?;
    let response = gateway.create_payment(&request).await?;
    Ok(Json(response))
}

async fn generate_upi_qr(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<UpiQrRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    authorize(Operation::CreatePayment, user.role()?, Relationship::Other)?;

    let gateway = state.payments.gateway(request.provider)?;
    let response = gateway.generate_upi_qr(&request).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
struct ProviderQuery {
    provider: PaymentProvider,
}

async fn payment_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(payment_id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Json<PaymentResponse>, AppError> {
    authorize(Operation::ViewPayment, user.role()?, Relationship::Other)?;

    let gateway = state.payments.gateway(query.provider)?;
    let response = gateway.payment_status(&payment_id).await?;
    Ok(Json(response))
}

async fn refund(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<RefundRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    authorize(Operation::RefundPayment, user.role()?, Relationship::Other)?;

    let gateway = state.payments.gateway(request.provider)?;
    let response = gateway
        .refund(&request.payment_id, request.amount, &request.reason)
        .await?;
    Ok(Json(response))
}

async fn enabled_providers(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<PaymentProvider>>, AppError> {
    authorize(Operation::ViewPayment, user.role()?, Relationship::Other)?;

    Ok(Json(state.payments.enabled_providers()))
}

fn signature_header(provider: PaymentProvider) -> &'static str {
    match provider {
        PaymentProvider::Razorpay => "X-Razorpay-Signature",
        PaymentProvider::Paytm => "X-Paytm-Signature",
        PaymentProvider::PhonePe => "X-Verify",
    }
}

/// Provider callbacks carry their own signatures instead of bearer auth;
/// an invalid or missing signature is rejected before the body is parsed.
async fn webhook(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, AppError> {
    let provider = PaymentProvider::from_slug(&slug).ok_or(AppError::NotFound)?;
    let gateway = state.payments.gateway(provider)?;

    let signature = headers
        .get(signature_header(provider))
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !gateway.verify_webhook(signature, &body) {
        warn!("Invalid {} webhook signature", provider.as_str());
        return Err(AppError::Validation("Invalid signature".into()));
    }

    let result = gateway.parse_webhook(&body)?;
    info!(
        "{} webhook processed for payment {}",
        provider.as_str(),
        result.payment_id
    );
    Ok(StatusCode::OK)
}
