use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub token_minutes: i64,
    pub refresh_days: i64,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub enabled: bool,
    pub test_mode: bool,
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
    pub base_url: String,
    pub qr_expiry_minutes: u32,
}

#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    pub razorpay: GatewayConfig,
    pub paytm: GatewayConfig,
    pub phonepe: GatewayConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub redis_url: String,
    pub cors_origin: String,
    pub jwt: JwtConfig,
    pub payments: PaymentsConfig,
}

impl Config {
    pub fn load() -> Self {
        let backend = match try_load::<String>("STORE_BACKEND", "redis").as_str() {
            "memory" => StoreBackend::Memory,
            _ => StoreBackend::Redis,
        };

        Self {
            port: try_load("RUST_PORT", "8080"),
            store_backend: backend,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379"),
            cors_origin: try_load("CORS_ORIGIN", "http://localhost:3000"),
            jwt: JwtConfig {
                secret: read_secret("JWT_SECRET", "dev-only-jwt-secret-change-me"),
                issuer: try_load("JWT_ISSUER", "pantry"),
                audience: try_load("JWT_AUDIENCE", "pantry-clients"),
                token_minutes: try_load("JWT_TOKEN_MINUTES", "60"),
                refresh_days: try_load("JWT_REFRESH_DAYS", "7"),
            },
            payments: PaymentsConfig {
                razorpay: gateway("RAZORPAY", "https://api.razorpay.com"),
                paytm: gateway("PAYTM", "https://securegw.paytm.in"),
                phonepe: gateway("PHONEPE", "https://api.phonepe.com/apis/hermes"),
            },
        }
    }
}

fn gateway(prefix: &str, default_base_url: &str) -> GatewayConfig {
    GatewayConfig {
        enabled: try_load(&format!("{prefix}_ENABLED"), "true"),
        test_mode: try_load(&format!("{prefix}_TEST_MODE"), "true"),
        key_id: try_load(&format!("{prefix}_KEY_ID"), ""),
        key_secret: read_secret(&format!("{prefix}_KEY_SECRET"), ""),
        webhook_secret: read_secret(&format!("{prefix}_WEBHOOK_SECRET"), ""),
        base_url: try_load(&format!("{prefix}_BASE_URL"), default_base_url),
        qr_expiry_minutes: try_load(&format!("{prefix}_QR_EXPIRY_MINUTES"), "15"),
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Secrets come from docker secret files first, then the environment, then
/// a development default.
fn read_secret(secret_name: &str, default: &str) -> String {
    let path = format!("/run/secrets/{secret_name}");

    if let Ok(contents) = read_to_string(&path) {
        return contents.trim().to_string();
    }

    var(secret_name).unwrap_or_else(|_| {
        info!("{secret_name} not provided, using development default");
        default.to_string()
    })
}
