//! Razorpay over its REST API: basic-auth key pair, amounts in paise,
//! webhook signed with HMAC-SHA256 of the raw body in hex.

use async_trait::async_trait;
use chrono::Duration;
use pantry::now;
use pantry::payment::{
    PaymentProvider, PaymentRequest, PaymentResponse, PaymentStatus, UpiQrRequest,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use super::{empty_response, gateway_error, hmac_sha256_hex, minor_units, PaymentGateway};
use crate::config::GatewayConfig;
use crate::error::{AppError, AppResult};

pub struct RazorpayGateway {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: GatewayConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    async fn post(&self, path: &str, body: Value) -> AppResult<Value> {
        let url = format!("{}{}", self.config.base_url, path);
        self.http
            .post(url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| gateway_error(PaymentProvider::Razorpay, e))?
            .json()
            .await
            .map_err(|e| gateway_error(PaymentProvider::Razorpay, e))
    }

    async fn get(&self, path: &str) -> AppResult<Value> {
        let url = format!("{}{}", self.config.base_url, path);
        self.http
            .get(url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| gateway_error(PaymentProvider::Razorpay, e))?
            .json()
            .await
            .map_err(|e| gateway_error(PaymentProvider::Razorpay, e))
    }
}

fn map_status(status: &str) -> PaymentStatus {
    match status {
        "created" => PaymentStatus::Created,
        "authorized" => PaymentStatus::Pending,
        "captured" | "paid" => PaymentStatus::Success,
        "refunded" => PaymentStatus::Refunded,
        "failed" => PaymentStatus::Failed,
        _ => PaymentStatus::Pending,
    }
}

fn text(value: &Value, key: &str) -> String {
    value[key].as_str().unwrap_or_default().to_string()
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Razorpay
    }

    async fn create_payment(&self, request: &PaymentRequest) -> AppResult<PaymentResponse> {
        let body = json!({
            "amount": minor_units(request.amount)?,
            "currency": request.currency,
            "receipt": request.order_number,
            "notes": {
                "orderId": request.order_id,
                "customer": request.customer_name,
                "description": request.description,
            },
        });
        let reply = self.post("/v1/orders", body).await?;

        let mut response = empty_response(
            PaymentProvider::Razorpay,
            text(&reply, "id"),
            request.order_id.clone(),
            map_status(reply["status"].as_str().unwrap_or("created")),
            request.amount,
            request.currency.clone(),
        );
        response.provider_transaction_id = text(&reply, "id");
        response.provider_metadata = Some(reply);
        Ok(response)
    }

    async fn generate_upi_qr(&self, request: &UpiQrRequest) -> AppResult<PaymentResponse> {
        let expiry_minutes = request
            .expiry_minutes
            .unwrap_or(self.config.qr_expiry_minutes);
        let close_by = now() + Duration::minutes(expiry_minutes as i64);

        let body = json!({
            "type": "upi_qr",
            "usage": "single_use",
            "fixed_amount": true,
            "payment_amount": minor_units(request.amount)?,
            "description": request.description,
            "close_by": close_by.timestamp(),
            "notes": { "orderId": request.order_id },
        });
        let reply = self.post("/v1/payments/qr_codes", body).await?;

        let mut response = empty_response(
            PaymentProvider::Razorpay,
            text(&reply, "id"),
            request.order_id.clone(),
            PaymentStatus::Created,
            request.amount,
            request.currency.clone(),
        );
        response.upi_qr_code = reply["image_url"].as_str().map(str::to_string);
        response.upi_qr_data = reply["image_content"].as_str().map(str::to_string);
        response.qr_expires_at = Some(close_by);
        response.provider_metadata = Some(reply);
        Ok(response)
    }

    async fn payment_status(&self, payment_id: &str) -> AppResult<PaymentResponse> {
        let reply = self.get(&format!("/v1/payments/{payment_id}")).await?;

        let amount = reply["amount"].as_i64().unwrap_or(0);
        let mut response = empty_response(
            PaymentProvider::Razorpay,
            payment_id.to_string(),
            text(&reply, "order_id"),
            map_status(reply["status"].as_str().unwrap_or_default()),
            Decimal::from(amount) / Decimal::from(100),
            text(&reply, "currency"),
        );
        response.provider_transaction_id = text(&reply, "id");
        response.provider_metadata = Some(reply);
        Ok(response)
    }

    async fn refund(
        &self,
        payment_id: &str,
        amount: Decimal,
        reason: &str,
    ) -> AppResult<PaymentResponse> {
        let body = json!({
            "amount": minor_units(amount)?,
            "notes": { "reason": reason },
        });
        let reply = self
            .post(&format!("/v1/payments/{payment_id}/refund"), body)
            .await?;

        let mut response = empty_response(
            PaymentProvider::Razorpay,
            payment_id.to_string(),
            String::new(),
            PaymentStatus::Refunded,
            amount,
            text(&reply, "currency"),
        );
        response.refund_id = reply["id"].as_str().map(str::to_string);
        response.refund_amount = Some(amount);
        response.provider_metadata = Some(reply);
        Ok(response)
    }

    fn verify_webhook(&self, signature: &str, payload: &str) -> bool {
        hmac_sha256_hex(&self.config.webhook_secret, payload) == signature
    }

    fn parse_webhook(&self, payload: &str) -> AppResult<PaymentResponse> {
        let body: Value = serde_json::from_str(payload)
            .map_err(|_| AppError::Validation("Malformed webhook payload".into()))?;
        let entity = &body["payload"]["payment"]["entity"];

        let amount = entity["amount"].as_i64().unwrap_or(0);
        let mut response = empty_response(
            PaymentProvider::Razorpay,
            text(entity, "id"),
            text(entity, "order_id"),
            map_status(entity["status"].as_str().unwrap_or_default()),
            Decimal::from(amount) / Decimal::from(100),
            text(entity, "currency"),
        );
        response.provider_transaction_id = text(entity, "id");
        response.provider_metadata = Some(body);
        Ok(response)
    }
}
