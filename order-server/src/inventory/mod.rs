//! Inventory Ledger
//!
//! Owns the authoritative per-product stock counter. Reservation is a
//! single conditional UPDATE, so the check-and-decrement is atomic per
//! product row: two concurrent reservations for the last units can never
//! both succeed. Cross-product operations do not contend with each other.
//!
//! The ledger performs no cross-component compensation — callers that
//! reserve several lines and fail partway own the rollback.

use sqlx::SqlitePool;
use thiserror::Error;

/// Ledger error types
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Recoverable business condition: the counter was left untouched
    #[error("Insufficient stock for product {0}")]
    InsufficientStock(i64),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Authoritative stock counters with atomic reserve/release
#[derive(Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
}

impl InventoryLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Atomically reserve `quantity` units of a product.
    ///
    /// The guard (`stock >= quantity`) and the decrement execute as one
    /// statement; on insufficient stock the counter is untouched and the
    /// caller gets `InsufficientStock`.
    pub async fn reserve(&self, product_id: i64, quantity: i32) -> LedgerResult<()> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity(quantity));
        }

        let rows = sqlx::query(
            "UPDATE products SET stock = stock - ?1, updated_at = ?2 \
             WHERE id = ?3 AND stock >= ?1",
        )
        .bind(quantity)
        .bind(shared::util::now_millis())
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        if rows.rows_affected() == 1 {
            tracing::debug!(product_id, quantity, "Stock reserved");
            return Ok(());
        }

        // Distinguish a missing product from a short counter
        match self.stock_of(product_id).await? {
            Some(stock) => {
                tracing::debug!(product_id, quantity, stock, "Reservation refused");
                Err(LedgerError::InsufficientStock(product_id))
            }
            None => Err(LedgerError::ProductNotFound(product_id)),
        }
    }

    /// Atomically return `quantity` units to a product.
    ///
    /// No upper bound is enforced. Callers are responsible for releasing
    /// exactly once per unit previously reserved. A missing product is a
    /// no-op: order items hold weak references and the product may have
    /// been deleted since the reservation.
    pub async fn release(&self, product_id: i64, quantity: i32) -> LedgerResult<()> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity(quantity));
        }

        let rows = sqlx::query("UPDATE products SET stock = stock + ?, updated_at = ? WHERE id = ?")
            .bind(quantity)
            .bind(shared::util::now_millis())
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if rows.rows_affected() == 0 {
            tracing::warn!(product_id, quantity, "Release for unknown product ignored");
        } else {
            tracing::debug!(product_id, quantity, "Stock released");
        }
        Ok(())
    }

    /// Current counter value (read-only; for handlers and tests)
    pub async fn stock_of(&self, product_id: i64) -> LedgerResult<Option<i32>> {
        let stock = sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use rust_decimal::Decimal;
    use shared::models::product::ProductCreate;

    async fn ledger_with_product(stock: i32) -> (InventoryLedger, i64) {
        let db = DbService::open_in_memory().await.unwrap();
        let product = crate::db::repository::product::create(
            &db.pool,
            ProductCreate {
                name: "Widget".into(),
                unit_price: Decimal::new(999, 2),
                stock,
            },
        )
        .await
        .unwrap();
        (InventoryLedger::new(db.pool), product.id)
    }

    #[tokio::test]
    async fn reserve_decrements_stock() {
        let (ledger, id) = ledger_with_product(5).await;
        ledger.reserve(id, 3).await.unwrap();
        assert_eq!(ledger.stock_of(id).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn reserve_refuses_and_leaves_counter_untouched() {
        let (ledger, id) = ledger_with_product(2).await;
        let err = ledger.reserve(id, 3).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock(p) if p == id));
        assert_eq!(ledger.stock_of(id).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn reserve_exact_stock_drains_to_zero() {
        let (ledger, id) = ledger_with_product(4).await;
        ledger.reserve(id, 4).await.unwrap();
        assert_eq!(ledger.stock_of(id).await.unwrap(), Some(0));
        let err = ledger.reserve(id, 1).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock(_)));
    }

    #[tokio::test]
    async fn release_restores_stock() {
        let (ledger, id) = ledger_with_product(5).await;
        ledger.reserve(id, 5).await.unwrap();
        ledger.release(id, 2).await.unwrap();
        assert_eq!(ledger.stock_of(id).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn release_for_unknown_product_is_a_noop() {
        let (ledger, _) = ledger_with_product(1).await;
        ledger.release(4242, 3).await.unwrap();
    }

    #[tokio::test]
    async fn reserve_unknown_product_reports_not_found() {
        let (ledger, _) = ledger_with_product(1).await;
        let err = ledger.reserve(4242, 1).await.unwrap_err();
        assert!(matches!(err, LedgerError::ProductNotFound(4242)));
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let (ledger, id) = ledger_with_product(1).await;
        assert!(matches!(
            ledger.reserve(id, 0).await.unwrap_err(),
            LedgerError::InvalidQuantity(0)
        ));
        assert!(matches!(
            ledger.release(id, -1).await.unwrap_err(),
            LedgerError::InvalidQuantity(-1)
        ));
    }

    #[tokio::test]
    async fn concurrent_reservations_never_oversubscribe() {
        let (ledger, id) = ledger_with_product(5).await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move { ledger.reserve(id, 1).await }));
        }

        let mut ok = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(LedgerError::InsufficientStock(_)) => refused += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(ok, 5);
        assert_eq!(refused, 5);
        assert_eq!(ledger.stock_of(id).await.unwrap(), Some(0));
    }
}
