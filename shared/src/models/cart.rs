//! Cart Models

use serde::{Deserialize, Serialize};

/// Cart item entity (one product per row, quantity accumulates)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Immutable (product, quantity) pair read at checkout time.
///
/// Checkout never mutates the cart through this view; it only clears the
/// whole cart after the order has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i32,
}

impl From<&CartItem> for CartLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}
