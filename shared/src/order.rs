//! Order Request and Event Types
//!
//! Wire-level payloads exchanged with the order lifecycle manager: the
//! request DTOs consumed by the HTTP layer and the lifecycle events
//! broadcast to notification subscribers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{OrderStatus, PaymentMethod};

// =============================================================================
// Request DTOs
// =============================================================================

/// Checkout payload — converts the caller's cart into an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: String,
}

/// Status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Settlement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRequest {
    pub method: PaymentMethod,
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: i64,
    pub quantity: i32,
}

/// Cart quantity update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

// =============================================================================
// Lifecycle events
// =============================================================================

/// Lifecycle events broadcast after the corresponding state change has
/// been committed. Delivery is fire-and-forget: subscribers handle
/// out-of-band concerns (email, webhooks) and may miss events if they lag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    OrderCreated {
        order_id: i64,
        customer_id: i64,
        total: Decimal,
    },
    OrderStatusChanged {
        order_id: i64,
        customer_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    },
    OrderCancelled {
        order_id: i64,
        customer_id: i64,
    },
}

impl LifecycleEvent {
    pub fn order_id(&self) -> i64 {
        match self {
            LifecycleEvent::OrderCreated { order_id, .. }
            | LifecycleEvent::OrderStatusChanged { order_id, .. }
            | LifecycleEvent::OrderCancelled { order_id, .. } => *order_id,
        }
    }
}
