//! Collaborator seams consumed by the order lifecycle manager
//!
//! The cart and the settlement gateway are external collaborators: the
//! manager depends only on these traits, never on their backing stores.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::db::repository::RepoResult;
use shared::models::{CartLine, PaymentMethod};

/// Read-only view of a customer's cart, plus the post-checkout clear.
///
/// The snapshot handed out by `cart_lines` is immutable from the
/// manager's perspective; line order is cart insertion order and fixes
/// both the reservation sequence and any compensating rollback.
#[async_trait]
pub trait CartSource: Send + Sync {
    async fn cart_lines(&self, customer_id: i64) -> RepoResult<Vec<CartLine>>;

    /// Best effort from the caller's perspective: checkout logs a clear
    /// failure but never rolls back the order for it.
    async fn clear_cart(&self, customer_id: i64) -> RepoResult<()>;
}

/// Outcome of a settlement attempt at the gateway
#[derive(Debug, Clone)]
pub enum Settlement {
    Settled { transaction_id: String },
    Failed { reason: String },
}

/// Pass/fail settlement signal from the payment provider
#[async_trait]
pub trait SettlementGateway: Send + Sync {
    async fn settle(&self, order_id: i64, amount: Decimal, method: PaymentMethod) -> Settlement;
}
