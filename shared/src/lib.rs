//! Shared types for the order platform
//!
//! Domain models, request/DTO types, lifecycle event types, and small
//! utilities used by both the server and its clients.

pub mod models;
pub mod order;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{CartItem, Order, OrderItem, OrderStatus, Payment, PaymentMethod, Product};
pub use order::LifecycleEvent;
pub use types::{Actor, Role};
