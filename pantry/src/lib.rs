//! Shared domain types for the Pantry food-ordering platform.
//!
//! Everything here is plain data plus the invariants that belong to the
//! data itself (the order status machine, captured totals). No I/O; the
//! server crate owns persistence and transport.

pub mod menu;
pub mod order;
pub mod payment;
pub mod restaurant;
pub mod user;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generates a document id. Every persisted entity is keyed by one of these.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Single consistent clock for audit timestamps.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
