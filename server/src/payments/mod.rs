//! # Payment gateways
//!
//! A thin strategy layer over three hosted providers. Each gateway builds
//! the provider's HTTP calls, maps its response fields and verifies its
//! webhook signature scheme; all real payment processing happens on the
//! provider side. The factory hands out the right gateway for a provider
//! enum value and answers which providers are enabled.

pub mod paytm;
pub mod phonepe;
pub mod razorpay;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use pantry::payment::{
    PaymentProvider, PaymentRequest, PaymentResponse, PaymentStatus, UpiQrRequest,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use sha2::{Digest, Sha256};

use crate::config::PaymentsConfig;
use crate::error::{AppError, AppResult};

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn provider(&self) -> PaymentProvider;

    async fn create_payment(&self, request: &PaymentRequest) -> AppResult<PaymentResponse>;

    async fn generate_upi_qr(&self, request: &UpiQrRequest) -> AppResult<PaymentResponse>;

    async fn payment_status(&self, payment_id: &str) -> AppResult<PaymentResponse>;

    async fn refund(
        &self,
        payment_id: &str,
        amount: Decimal,
        reason: &str,
    ) -> AppResult<PaymentResponse>;

    /// Checks the provider's webhook signature over the raw body. Callers
    /// reject the webhook before parsing when this returns false.
    fn verify_webhook(&self, signature: &str, payload: &str) -> bool;

    /// Maps a verified webhook body onto the common response shape.
    fn parse_webhook(&self, payload: &str) -> AppResult<PaymentResponse>;
}

pub struct PaymentFactory {
    gateways: HashMap<PaymentProvider, Arc<dyn PaymentGateway>>,
    enabled: HashMap<PaymentProvider, bool>,
}

impl PaymentFactory {
    pub fn new(config: &PaymentsConfig, http: reqwest::Client) -> Self {
        let mut gateways: HashMap<PaymentProvider, Arc<dyn PaymentGateway>> = HashMap::new();
        gateways.insert(
            PaymentProvider::Razorpay,
            Arc::new(razorpay::RazorpayGateway::new(config.razorpay.clone(), http.clone())),
        );
        gateways.insert(
            PaymentProvider::Paytm,
            Arc::new(paytm::PaytmGateway::new(config.paytm.clone(), http.clone())),
        );
        gateways.insert(
            PaymentProvider::PhonePe,
            Arc::new(phonepe::PhonePeGateway::new(config.phonepe.clone(), http)),
        );

        let enabled = HashMap::from([
            (PaymentProvider::Razorpay, config.razorpay.enabled),
            (PaymentProvider::Paytm, config.paytm.enabled),
            (PaymentProvider::PhonePe, config.phonepe.enabled),
        ]);

        Self { gateways, enabled }
    }

    /// The gateway for `provider`, or a validation failure when the
    /// provider is disabled by configuration.
    pub fn gateway(&self, provider: PaymentProvider) -> AppResult<Arc<dyn PaymentGateway>> {
        if !self.enabled.get(&provider).copied().unwrap_or(false) {
            return Err(AppError::Validation(format!(
                "Payment provider {} is not enabled",
                provider.as_str()
            )));
        }
        self.gateways
            .get(&provider)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("no gateway for {}", provider.as_str())))
    }

    pub fn enabled_providers(&self) -> Vec<PaymentProvider> {
        PaymentProvider::ALL
            .into_iter()
            .filter(|p| self.enabled.get(p).copied().unwrap_or(false))
            .collect()
    }
}

/// Currency amounts cross the wire in minor units (paise). Midpoints
/// round away from zero, as money does.
pub(crate) fn minor_units(amount: Decimal) -> AppResult<i64> {
    (amount * dec!(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| AppError::Validation("Amount out of range".into()))
}

pub(crate) fn hmac_sha256_hex(secret: &str, payload: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub(crate) fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

pub(crate) fn gateway_error(provider: PaymentProvider, err: reqwest::Error) -> AppError {
    AppError::Internal(format!("{} request failed: {err}", provider.as_str()))
}

pub(crate) fn empty_response(
    provider: PaymentProvider,
    payment_id: String,
    order_id: String,
    status: PaymentStatus,
    amount: Decimal,
    currency: String,
) -> PaymentResponse {
    PaymentResponse {
        payment_id,
        order_id,
        provider,
        status,
        amount,
        currency,
        provider_transaction_id: String::new(),
        upi_qr_code: None,
        upi_qr_data: None,
        qr_expires_at: None,
        payment_url: None,
        provider_metadata: None,
        refund_id: None,
        refund_amount: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn disabled_config() -> PaymentsConfig {
        let gateway = GatewayConfig {
            enabled: false,
            test_mode: true,
            key_id: "key".into(),
            key_secret: "secret".into(),
            webhook_secret: "hook".into(),
            base_url: "https://example.invalid".into(),
            qr_expiry_minutes: 15,
        };
        PaymentsConfig {
            razorpay: GatewayConfig {
                enabled: true,
                ..gateway.clone()
            },
            paytm: gateway.clone(),
            phonepe: gateway,
        }
    }

    #[test]
    fn factory_reports_enabled_providers() {
        let factory = PaymentFactory::new(&disabled_config(), reqwest::Client::new());
        assert_eq!(factory.enabled_providers(), vec![PaymentProvider::Razorpay]);

        assert!(factory.gateway(PaymentProvider::Razorpay).is_ok());
        let denied = factory.gateway(PaymentProvider::Paytm);
        assert!(matches!(denied, Err(AppError::Validation(_))));
    }

    #[test]
    fn minor_units_rounds_to_paise() {
        assert_eq!(minor_units(dec!(286)).unwrap(), 28600);
        assert_eq!(minor_units(dec!(10.505)).unwrap(), 1051);
    }
}
