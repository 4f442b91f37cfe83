//! # Order lifecycle
//!
//! The one component here with multi-step invariants:
//! - line items and totals are captured at creation and never recomputed;
//! - `total == sub_total + delivery_fee + tax` at the captured values;
//! - every status change appends exactly one history entry, and history is
//!   never rewritten;
//! - status changes must follow the allowed-transition table; illegal edges
//!   are rejected, not silently accepted;
//! - cancellation is owner-only and refuses terminal orders without
//!   mutating anything.

use std::sync::atomic::{AtomicU64, Ordering};

use pantry::now;
use pantry::order::{CreateOrderRequest, Order, OrderItem, OrderStatus, UpdateOrderStatusRequest};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::repository::{MenuItemRepository, OrderRepository};

/// Flat delivery fee charged on every order.
pub const DELIVERY_FEE: Decimal = dec!(50);

/// GST applied to the item subtotal.
pub const TAX_RATE: Decimal = dec!(0.18);

static ORDER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Human-readable order number: creation date plus a process-local
/// counter. Uniqueness is the document id's job, not this one's.
fn next_order_number() -> String {
    let sequence = ORDER_SEQUENCE.fetch_add(1, Ordering::SeqCst) % 100_000;
    format!("PT{}{:05}", now().format("%Y%m%d"), sequence)
}

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    menu: MenuItemRepository,
}

impl OrderService {
    pub fn new(orders: OrderRepository, menu: MenuItemRepository) -> Self {
        Self { orders, menu }
    }

    /// Validates availability of every requested item, captures prices,
    /// computes totals and persists the new Pending order. Nothing is
    /// persisted when any line fails validation.
    pub async fn create(&self, request: CreateOrderRequest, user_id: &str) -> AppResult<Order> {
        info!("Creating order for user {user_id}");

        if request.items.is_empty() {
            return Err(AppError::Validation("Order must contain at least one item".into()));
        }

        let mut items = Vec::with_capacity(request.items.len());
        let mut sub_total = Decimal::ZERO;

        for line in &request.items {
            let menu_item = self
                .menu
                .get(&line.menu_item_id)
                .await?
                .filter(|item| !item.is_deleted && item.is_available)
                .ok_or_else(|| {
                    AppError::Validation(format!("Menu item {} is not available", line.menu_item_id))
                })?;

            let total_price = menu_item.price * Decimal::from(line.quantity);
            sub_total += total_price;
            items.push(OrderItem {
                menu_item_id: line.menu_item_id.clone(),
                menu_item_name: menu_item.name,
                quantity: line.quantity,
                unit_price: menu_item.price,
                total_price,
                variant: line.variant.clone(),
                special_instructions: line.special_instructions.clone(),
            });
        }

        let tax = (sub_total * TAX_RATE)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let order = Order::new(
            user_id,
            &request.restaurant_id,
            next_order_number(),
            items,
            sub_total,
            DELIVERY_FEE,
            tax,
            request.delivery_address,
            request.payment_method,
            request.delivery_instructions,
        );

        self.orders.create(&order).await?;
        info!("Order {} created with number {}", order.id, order.order_number);
        Ok(order)
    }

    pub async fn get(&self, id: &str) -> AppResult<Order> {
        self.orders
            .get(id)
            .await?
            .filter(|order| !order.is_deleted)
            .ok_or(AppError::NotFound)
    }

    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Order>> {
        Ok(self.orders.by_user(user_id).await?)
    }

    pub async fn list_by_restaurant(&self, restaurant_id: &str) -> AppResult<Vec<Order>> {
        Ok(self.orders.by_restaurant(restaurant_id).await?)
    }

    /// Applies a status transition on behalf of `actor`, appending one
    /// history entry. Illegal transitions are a validation failure and
    /// leave the order untouched.
    pub async fn update_status(
        &self,
        id: &str,
        request: UpdateOrderStatusRequest,
        actor: &str,
    ) -> AppResult<Order> {
        info!("Updating order {id} to {:?}", request.status);

        let mut order = self.get(id).await?;

        if !order.status.can_transition_to(request.status) {
            return Err(AppError::Validation(format!(
                "Cannot move order from {:?} to {:?}",
                order.status, request.status
            )));
        }

        order.record_status(request.status, request.notes, actor);
        self.orders.update(&order).await?;
        Ok(order)
    }

    /// True only when the order exists, belongs to `user_id` and is not in
    /// a terminal state. A false return means nothing was mutated.
    pub async fn cancel(&self, id: &str, user_id: &str) -> AppResult<bool> {
        info!("Cancelling order {id} for user {user_id}");

        let Some(mut order) = self.orders.get(id).await? else {
            return Ok(false);
        };
        if order.is_deleted || order.user_id != user_id || order.status.is_terminal() {
            return Ok(false);
        }

        order.record_status(OrderStatus::Cancelled, "Order cancelled by user", user_id);
        self.orders.update(&order).await?;
        Ok(true)
    }
}
