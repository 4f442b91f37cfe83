//! Paytm over its merchant API: signed request heads, transaction tokens
//! redeemed on a hosted payment page, webhook HMAC in hex.

use async_trait::async_trait;
use pantry::payment::{
    PaymentProvider, PaymentRequest, PaymentResponse, PaymentStatus, UpiQrRequest,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use super::{empty_response, gateway_error, hmac_sha256_hex, PaymentGateway};
use crate::config::GatewayConfig;
use crate::error::{AppError, AppResult};

pub struct PaytmGateway {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl PaytmGateway {
    pub fn new(config: GatewayConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    fn signed(&self, body: Value) -> Value {
        let signature = hmac_sha256_hex(&self.config.key_secret, &body.to_string());
        json!({ "body": body, "head": { "signature": signature } })
    }

    async fn post(&self, path_and_query: &str, body: Value) -> AppResult<Value> {
        let url = format!("{}{}", self.config.base_url, path_and_query);
        self.http
            .post(url)
            .json(&self.signed(body))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| gateway_error(PaymentProvider::Paytm, e))?
            .json()
            .await
            .map_err(|e| gateway_error(PaymentProvider::Paytm, e))
    }
}

fn map_status(result_status: &str) -> PaymentStatus {
    match result_status {
        "TXN_SUCCESS" => PaymentStatus::Success,
        "TXN_FAILURE" => PaymentStatus::Failed,
        "PENDING" => PaymentStatus::Pending,
        _ => PaymentStatus::Pending,
    }
}

#[async_trait]
impl PaymentGateway for PaytmGateway {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Paytm
    }

    async fn create_payment(&self, request: &PaymentRequest) -> AppResult<PaymentResponse> {
        let website = if self.config.test_mode { "WEBSTAGING" } else { "DEFAULT" };
        let body = json!({
            "requestType": "Payment",
            "mid": self.config.key_id,
            "websiteName": website,
            "orderId": request.order_id,
            "txnAmount": {
                "value": request.amount.to_string(),
                "currency": request.currency,
            },
            "userInfo": {
                "custId": request.customer_phone,
                "email": request.customer_email,
            },
        });
        let reply = self
            .post(
                &format!(
                    "/theia/api/v1/initiateTransaction?mid={}&orderId={}",
                    self.config.key_id, request.order_id
                ),
                body,
            )
            .await?;

        let txn_token = reply["body"]["txnToken"].as_str().unwrap_or_default();
        let mut response = empty_response(
            PaymentProvider::Paytm,
            request.order_id.clone(),
            request.order_id.clone(),
            PaymentStatus::Created,
            request.amount,
            request.currency.clone(),
        );
        response.provider_transaction_id = txn_token.to_string();
        response.payment_url = Some(format!(
            "{}/theia/api/v1/showPaymentPage?mid={}&orderId={}",
            self.config.base_url, self.config.key_id, request.order_id
        ));
        response.provider_metadata = Some(reply);
        Ok(response)
    }

    async fn generate_upi_qr(&self, request: &UpiQrRequest) -> AppResult<PaymentResponse> {
        let body = json!({
            "mid": self.config.key_id,
            "orderId": request.order_id,
            "amount": request.amount.to_string(),
            "businessType": "UPI_QR_CODE",
            "posId": request.customer_phone,
        });
        let reply = self
            .post("/paymentservices/qr/create", body)
            .await?;

        let mut response = empty_response(
            PaymentProvider::Paytm,
            reply["body"]["qrCodeId"].as_str().unwrap_or_default().to_string(),
            request.order_id.clone(),
            PaymentStatus::Created,
            request.amount,
            request.currency.clone(),
        );
        response.upi_qr_data = reply["body"]["qrData"].as_str().map(str::to_string);
        response.upi_qr_code = reply["body"]["image"].as_str().map(str::to_string);
        response.provider_metadata = Some(reply);
        Ok(response)
    }

    async fn payment_status(&self, payment_id: &str) -> AppResult<PaymentResponse> {
        let body = json!({
            "mid": self.config.key_id,
            "orderId": payment_id,
        });
        let reply = self.post("/v3/order/status", body).await?;

        let result = &reply["body"];
        let amount = result["txnAmount"]
            .as_str()
            .and_then(|v| v.parse::<Decimal>().ok())
            .unwrap_or(Decimal::ZERO);
        let mut response = empty_response(
            PaymentProvider::Paytm,
            payment_id.to_string(),
            result["orderId"].as_str().unwrap_or_default().to_string(),
            map_status(result["resultInfo"]["resultStatus"].as_str().unwrap_or_default()),
            amount,
            "INR".to_string(),
        );
        response.provider_transaction_id =
            result["txnId"].as_str().unwrap_or_default().to_string();
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
            "mid": self.config.key_id,
            "orderId": payment_id,
            "refId": format!("refund-{payment_id}"),
            "refundAmount": amount.to_string(),
            "comments": reason,
        });
        let reply = self.post("/refund/apply", body).await?;

        let mut response = empty_response(
            PaymentProvider::Paytm,
            payment_id.to_string(),
            String::new(),
            PaymentStatus::Refunded,
            amount,
            "INR".to_string(),
        );
        response.refund_id = reply["body"]["refundId"].as_str().map(str::to_string);
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

        let amount = body["TXNAMOUNT"]
            .as_str()
            .and_then(|v| v.parse::<Decimal>().ok())
            .unwrap_or(Decimal::ZERO);
        let mut response = empty_response(
            PaymentProvider::Paytm,
            body["ORDERID"].as_str().unwrap_or_default().to_string(),
            body["ORDERID"].as_str().unwrap_or_default().to_string(),
            map_status(body["STATUS"].as_str().unwrap_or_default()),
            amount,
            "INR".to_string(),
        );
        response.provider_transaction_id =
            body["TXNID"].as_str().unwrap_or_default().to_string();
        response.provider_metadata = Some(body);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> PaytmGateway {
        PaytmGateway::new(
            GatewayConfig {
                enabled: true,
                test_mode: true,
                key_id: "MID123".into(),
                key_secret: "merchant-key".into(),
                webhook_secret: "merchant-key".into(),
                base_url: "https://securegw-stage.paytm.in".into(),
                qr_expiry_minutes: 15,
            },
            reqwest::Client::new(),
        )
    }

    #[test]
    fn webhook_round_trip() {
        let gateway = gateway();
        let payload = r#"{"ORDERID":"o1","STATUS":"TXN_SUCCESS","TXNAMOUNT":"286.00","TXNID":"t1"}"#;
        let signature = hmac_sha256_hex("merchant-key", payload);

        assert!(gateway.verify_webhook(&signature, payload));
        assert!(!gateway.verify_webhook(&signature, &payload.replace("o1", "o2")));

        let parsed = gateway.parse_webhook(payload).unwrap();
        assert_eq!(parsed.status, PaymentStatus::Success);
        assert_eq!(parsed.order_id, "o1");
        assert_eq!(parsed.provider_transaction_id, "t1");
    }
}
