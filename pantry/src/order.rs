//! The order record and its status machine.
//!
//! Orders capture their line items and totals at creation time; later menu
//! price changes never touch an existing order. Status changes only ever
//! append to `status_history` — entries are never rewritten or removed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::user::Address;
use crate::{new_id, now};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    ReadyForPickup,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The allowed-transition table. Anything not listed here is rejected
    /// by the order service rather than silently accepted.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Preparing)
                | (Confirmed, Cancelled)
                | (Preparing, ReadyForPickup)
                | (Preparing, Cancelled)
                | (ReadyForPickup, OutForDelivery)
                | (OutForDelivery, Delivered)
        )
    }
}

/// One captured line of an order. `unit_price` and `menu_item_name` are
/// snapshots of the menu item at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_item_id: String,
    pub menu_item_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub variant: String,
    pub special_instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusHistory {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub notes: String,
    pub updated_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Owning user; immutable after creation and the storage partition key.
    pub user_id: String,
    pub restaurant_id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub sub_total: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub delivery_address: Address,
    pub payment_method: String,
    pub payment_id: String,
    pub estimated_delivery_time: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub delivery_instructions: String,
    pub delivery_person_id: String,
    pub status_history: Vec<OrderStatusHistory>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl Order {
    /// A freshly created order: Pending, one history entry, totals already
    /// computed by the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        restaurant_id: impl Into<String>,
        order_number: impl Into<String>,
        items: Vec<OrderItem>,
        sub_total: Decimal,
        delivery_fee: Decimal,
        tax: Decimal,
        delivery_address: Address,
        payment_method: impl Into<String>,
        delivery_instructions: impl Into<String>,
    ) -> Self {
        let user_id = user_id.into();
        let created = now();
        Self {
            id: new_id(),
            restaurant_id: restaurant_id.into(),
            order_number: order_number.into(),
            status: OrderStatus::Pending,
            items,
            sub_total,
            delivery_fee,
            tax,
            total: sub_total + delivery_fee + tax,
            delivery_address,
            payment_method: payment_method.into(),
            payment_id: String::new(),
            estimated_delivery_time: None,
            delivered_at: None,
            delivery_instructions: delivery_instructions.into(),
            delivery_person_id: String::new(),
            status_history: vec![OrderStatusHistory {
                status: OrderStatus::Pending,
                timestamp: created,
                notes: "Order created".to_string(),
                updated_by: user_id.clone(),
            }],
            user_id,
            created_at: created,
            updated_at: created,
            is_deleted: false,
        }
    }

    /// Moves the order to `next` and appends the matching history entry.
    /// Callers validate the transition first; this only mutates.
    pub fn record_status(&mut self, next: OrderStatus, notes: impl Into<String>, actor: impl Into<String>) {
        let at = now();
        self.status = next;
        self.updated_at = at;
        if next == OrderStatus::Delivered {
            self.delivered_at = Some(at);
        }
        self.status_history.push(OrderStatusHistory {
            status: next,
            timestamp: at,
            notes: notes.into(),
            updated_by: actor.into(),
        });
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    pub menu_item_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub special_instructions: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub restaurant_id: String,
    pub items: Vec<CreateOrderItemRequest>,
    pub delivery_address: Address,
    pub payment_method: String,
    #[serde(default)]
    pub delivery_instructions: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_order() -> Order {
        Order::new(
            "user-1",
            "rest-1",
            "PT2024010100001",
            vec![OrderItem {
                menu_item_id: "m1".into(),
                menu_item_name: "Paneer Tikka".into(),
                quantity: 2,
                unit_price: dec!(100),
                total_price: dec!(200),
                variant: String::new(),
                special_instructions: String::new(),
            }],
            dec!(200),
            dec!(50),
            dec!(36),
            Address::default(),
            "UPI",
            "",
        )
    }

    #[test]
    fn new_order_is_pending_with_one_history_entry() {
        let order = sample_order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.status_history.len(), 1);
        assert_eq!(order.status_history[0].status, OrderStatus::Pending);
        assert_eq!(order.status_history[0].updated_by, "user-1");
        assert_eq!(order.total, dec!(286));
    }

    #[test]
    fn total_is_sum_of_components() {
        let order = sample_order();
        assert_eq!(order.total, order.sub_total + order.delivery_fee + order.tax);
    }

    #[test]
    fn record_status_appends_exactly_one_entry() {
        let mut order = sample_order();
        order.record_status(OrderStatus::Confirmed, "accepted", "vendor-1");
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.status_history.len(), 2);
        assert_eq!(order.status_history[1].updated_by, "vendor-1");
        assert!(order.delivered_at.is_none());
    }

    #[test]
    fn delivered_stamps_delivery_time() {
        let mut order = sample_order();
        order.record_status(OrderStatus::Delivered, "", "rider-1");
        assert!(order.delivered_at.is_some());
    }

    #[test]
    fn transition_table_accepts_the_happy_path() {
        use OrderStatus::*;
        let path = [Pending, Confirmed, Preparing, ReadyForPickup, OutForDelivery, Delivered];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn transition_table_rejects_terminal_and_backward_edges() {
        use OrderStatus::*;
        for next in [Pending, Confirmed, Preparing, ReadyForPickup, OutForDelivery, Cancelled] {
            assert!(!Delivered.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
        assert!(!Preparing.can_transition_to(Pending));
        assert!(!OutForDelivery.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Delivered));
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::OutForDelivery.is_terminal());
    }
}
