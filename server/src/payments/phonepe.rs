//! PhonePe over its hermes API: base64-wrapped request bodies, `X-VERIFY`
//! checksums of SHA-256(content + salt) suffixed with the salt index.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pantry::payment::{
    PaymentProvider, PaymentRequest, PaymentResponse, PaymentStatus, UpiQrRequest,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use super::{empty_response, gateway_error, minor_units, sha256_hex, PaymentGateway};
use crate::config::GatewayConfig;
use crate::error::{AppError, AppResult};

const SALT_INDEX: &str = "1";

pub struct PhonePeGateway {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl PhonePeGateway {
    pub fn new(config: GatewayConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    fn checksum(&self, content: &str) -> String {
        format!("{}###{SALT_INDEX}", sha256_hex(&format!("{content}{}", self.config.key_secret)))
    }

    async fn post_wrapped(&self, path: &str, inner: Value) -> AppResult<Value> {
        let encoded = BASE64.encode(inner.to_string());
        let checksum = self.checksum(&format!("{encoded}{path}"));
        let url = format!("{}{}", self.config.base_url, path);

        self.http
            .post(url)
            .header("X-VERIFY", checksum)
            .json(&json!({ "request": encoded }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| gateway_error(PaymentProvider::PhonePe, e))?
            .json()
            .await
            .map_err(|e| gateway_error(PaymentProvider::PhonePe, e))
    }

    async fn get_signed(&self, path: &str) -> AppResult<Value> {
        let checksum = self.checksum(path);
        let url = format!("{}{}", self.config.base_url, path);

        self.http
            .get(url)
            .header("X-VERIFY", checksum)
            .header("X-MERCHANT-ID", &self.config.key_id)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| gateway_error(PaymentProvider::PhonePe, e))?
            .json()
            .await
            .map_err(|e| gateway_error(PaymentProvider::PhonePe, e))
    }
}

fn map_status(code: &str) -> PaymentStatus {
    match code {
        "PAYMENT_SUCCESS" => PaymentStatus::Success,
        "PAYMENT_ERROR" | "PAYMENT_DECLINED" => PaymentStatus::Failed,
        "PAYMENT_PENDING" => PaymentStatus::Pending,
        "PAYMENT_INITIATED" => PaymentStatus::Created,
        _ => PaymentStatus::Pending,
    }
}

#[async_trait]
impl PaymentGateway for PhonePeGateway {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::PhonePe
    }

    async fn create_payment(&self, request: &PaymentRequest) -> AppResult<PaymentResponse> {
        let inner = json!({
            "merchantId": self.config.key_id,
            "merchantTransactionId": request.order_id,
            "amount": minor_units(request.amount)?,
            "merchantUserId": request.customer_phone,
            "paymentInstrument": { "type": "PAY_PAGE" },
        });
        let reply = self.post_wrapped("/pg/v1/pay", inner).await?;

        let mut response = empty_response(
            PaymentProvider::PhonePe,
            request.order_id.clone(),
            request.order_id.clone(),
            PaymentStatus::Created,
            request.amount,
            request.currency.clone(),
        );
        response.payment_url = reply["data"]["instrumentResponse"]["redirectInfo"]["url"]
            .as_str()
            .map(str::to_string);
        response.provider_metadata = Some(reply);
        Ok(response)
    }

    async fn generate_upi_qr(&self, request: &UpiQrRequest) -> AppResult<PaymentResponse> {
        let inner = json!({
            "merchantId": self.config.key_id,
            "merchantTransactionId": request.order_id,
            "amount": minor_units(request.amount)?,
            "merchantUserId": request.customer_phone,
            "paymentInstrument": { "type": "UPI_QR" },
        });
        let reply = self.post_wrapped("/pg/v1/pay", inner).await?;

        let mut response = empty_response(
            PaymentProvider::PhonePe,
            request.order_id.clone(),
            request.order_id.clone(),
            PaymentStatus::Created,
            request.amount,
            request.currency.clone(),
        );
        response.upi_qr_data = reply["data"]["instrumentResponse"]["qrData"]
            .as_str()
            .map(str::to_string);
        response.provider_metadata = Some(reply);
        Ok(response)
    }

    async fn payment_status(&self, payment_id: &str) -> AppResult<PaymentResponse> {
        let path = format!("/pg/v1/status/{}/{payment_id}", self.config.key_id);
        let reply = self.get_signed(&path).await?;

        let data = &reply["data"];
        let amount = data["amount"].as_i64().unwrap_or(0);
        let mut response = empty_response(
            PaymentProvider::PhonePe,
            payment_id.to_string(),
            data["merchantTransactionId"].as_str().unwrap_or_default().to_string(),
            map_status(reply["code"].as_str().unwrap_or_default()),
            Decimal::from(amount) / Decimal::from(100),
            "INR".to_string(),
        );
        response.provider_transaction_id =
            data["transactionId"].as_str().unwrap_or_default().to_string();
        response.provider_metadata = Some(reply);
        Ok(response)
    }

    async fn refund(
        &self,
        payment_id: &str,
        amount: Decimal,
        reason: &str,
    ) -> AppResult<PaymentResponse> {
        let inner = json!({
            "merchantId": self.config.key_id,
            "merchantTransactionId": format!("refund-{payment_id}"),
            "originalTransactionId": payment_id,
            "amount": minor_units(amount)?,
            "callbackUrl": "",
            "reason": reason,
        });
        let reply = self.post_wrapped("/pg/v1/refund", inner).await?;

        let mut response = empty_response(
            PaymentProvider::PhonePe,
            payment_id.to_string(),
            String::new(),
            PaymentStatus::Refunded,
            amount,
            "INR".to_string(),
        );
        response.refund_id = reply["data"]["merchantTransactionId"]
            .as_str()
            .map(str::to_string);
        response.refund_amount = Some(amount);
        response.provider_metadata = Some(reply);
        Ok(response)
    }

    fn verify_webhook(&self, signature: &str, payload: &str) -> bool {
        self.checksum(payload) == signature
    }

    fn parse_webhook(&self, payload: &str) -> AppResult<PaymentResponse> {
        let envelope: Value = serde_json::from_str(payload)
            .map_err(|_| AppError::Validation("Malformed webhook payload".into()))?;

        // The webhook wraps the actual event the same way requests are
        // wrapped: base64 JSON under "response".
        let decoded = envelope["response"]
            .as_str()
            .and_then(|encoded| BASE64.decode(encoded).ok())
            .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
            .ok_or_else(|| AppError::Validation("Malformed webhook payload".into()))?;

        let data = &decoded["data"];
        let amount = data["amount"].as_i64().unwrap_or(0);
        let mut response = empty_response(
            PaymentProvider::PhonePe,
            data["merchantTransactionId"].as_str().unwrap_or_default().to_string(),
            data["merchantTransactionId"].as_str().unwrap_or_default().to_string(),
            map_status(decoded["code"].as_str().unwrap_or_default()),
            Decimal::from(amount) / Decimal::from(100),
            "INR".to_string(),
        );
        response.provider_transaction_id =
            data["transactionId"].as_str().unwrap_or_default().to_string();
        response.provider_metadata = Some(decoded);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> PhonePeGateway {
        PhonePeGateway::new(
            GatewayConfig {
                enabled: true,
                test_mode: true,
                key_id: "MERCHANT1".into(),
                key_secret: "salt-key".into(),
                webhook_secret: "salt-key".into(),
                base_url: "https://api-preprod.phonepe.com/apis/pg-sandbox".into(),
                qr_expiry_minutes: 15,
            },
            reqwest::Client::new(),
        )
    }

    #[test]
    fn webhook_checksum_round_trip() {
        let gateway = gateway();
        let event = json!({
            "code": "PAYMENT_SUCCESS",
            "data": { "merchantTransactionId": "o1", "transactionId": "t1", "amount": 28600 }
        });
        let payload = json!({ "response": BASE64.encode(event.to_string()) }).to_string();
        let signature = gateway.checksum(&payload);

        assert!(gateway.verify_webhook(&signature, &payload));
        assert!(!gateway.verify_webhook(&signature, &payload.replace('o', "x")));

        let parsed = gateway.parse_webhook(&payload).unwrap();
        assert_eq!(parsed.status, PaymentStatus::Success);
        assert_eq!(parsed.payment_id, "o1");
        assert_eq!(parsed.amount, Decimal::from(286));
    }
}
