use crate::db::repository::RepoError;
use crate::inventory::LedgerError;
use shared::models::OrderStatus;
use thiserror::Error;

/// Manager errors
///
/// Business-rule failures (`EmptyCart` through `Forbidden`) never leave
/// partial state behind. `CancellationFailed` is operational: stock could
/// not be fully restored and an operator must reconcile — it carries its
/// own variant so it cannot be mistaken for a plain invalid transition.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Insufficient stock for product {0}")]
    InsufficientStock(i64),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Forbidden")]
    Forbidden,

    #[error("Cancellation failed for order {order_id}: {failed_releases} release(s) did not complete")]
    CancellationFailed { order_id: i64, failed_releases: usize },

    #[error("Settlement failed: {0}")]
    SettlementFailed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl From<LedgerError> for ManagerError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientStock(id) => ManagerError::InsufficientStock(id),
            LedgerError::ProductNotFound(id) => ManagerError::ProductNotFound(id),
            LedgerError::InvalidQuantity(q) => {
                ManagerError::Storage(RepoError::Validation(format!("invalid quantity {q}")))
            }
            LedgerError::Storage(e) => ManagerError::Storage(RepoError::Database(e.to_string())),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
