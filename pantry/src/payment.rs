use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentProvider {
    Razorpay,
    Paytm,
    PhonePe,
}

impl PaymentProvider {
    pub const ALL: [PaymentProvider; 3] = [
        PaymentProvider::Razorpay,
        PaymentProvider::Paytm,
        PaymentProvider::PhonePe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentProvider::Razorpay => "Razorpay",
            PaymentProvider::Paytm => "Paytm",
            PaymentProvider::PhonePe => "PhonePe",
        }
    }

    /// Parses the lowercase webhook path segment (`/webhook/razorpay`).
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "razorpay" => Some(PaymentProvider::Razorpay),
            "paytm" => Some(PaymentProvider::Paytm),
            "phonepe" => Some(PaymentProvider::PhonePe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Created,
    Pending,
    Success,
    Failed,
    Refunded,
    Expired,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: String,
    pub order_number: String,
    pub amount: Decimal,
    pub currency: String,
    pub provider: PaymentProvider,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiQrRequest {
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub provider: PaymentProvider,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expiry_minutes: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub payment_id: String,
    pub amount: Decimal,
    pub reason: String,
    pub provider: PaymentProvider,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: String,
    pub order_id: String,
    pub provider: PaymentProvider,
    pub status: PaymentStatus,
    pub amount: Decimal,
    pub currency: String,
    pub provider_transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_qr_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_qr_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<Decimal>,
}
