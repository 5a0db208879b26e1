//! Product Model
//!
//! The catalog side of a product is owned elsewhere; this server only
//! depends on `unit_price` (snapshotted at checkout) and `stock` (mutated
//! exclusively through the inventory ledger).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Current list price; orders capture their own copy at creation time
    pub unit_price: Decimal,
    /// Available quantity; never negative
    pub stock: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub unit_price: Decimal,
    pub stock: i32,
}

/// Price update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSetPrice {
    pub unit_price: Decimal,
}
