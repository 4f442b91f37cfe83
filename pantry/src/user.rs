use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{new_id, now};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    User,
    Vendor,
    Admin,
    Delivery,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "User",
            UserRole::Vendor => "Vendor",
            UserRole::Admin => "Admin",
            UserRole::Delivery => "Delivery",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "User" => Some(UserRole::User),
            "Vendor" => Some(UserRole::Vendor),
            "Admin" => Some(UserRole::Admin),
            "Delivery" => Some(UserRole::Delivery),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Persisted user record. The password digest never leaves the server; the
/// public view is [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_email_verified: bool,
    pub is_active: bool,
    pub refresh_token: Option<String>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub address: Option<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl User {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let created = now();
        Self {
            id: new_id(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            password_hash: password_hash.into(),
            role,
            is_email_verified: false,
            is_active: true,
            refresh_token: None,
            refresh_token_expires_at: None,
            address: None,
            created_at: created,
            updated_at: created,
            is_deleted: false,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            role: self.role,
            is_email_verified: self.is_email_verified,
            address: self.address.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub role: UserRole,
    pub is_email_verified: bool,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub address: Option<Address>,
}
