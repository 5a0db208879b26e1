//! OrderManager - the order lifecycle state machine
//!
//! The single writer of order state and the only component allowed to
//! call the inventory ledger and the order store together.
//!
//! # Checkout Flow
//!
//! ```text
//! checkout(customer_id)
//!     ├─ 1. Read cart snapshot (EmptyCart if no lines)
//!     ├─ 2. Reserve each line in cart order
//!     │       └─ on failure: release lines 0..k, fail with InsufficientStock
//!     ├─ 3. Snapshot unit prices, persist Order + items atomically
//!     │       └─ on storage fault: release ALL reservations, surface fault
//!     ├─ 4. Clear cart (best effort) and broadcast OrderCreated
//!     └─ 5. Return the order
//! ```
//!
//! Reservation and persistence are deliberately NOT one transaction; the
//! saga above compensates explicitly instead.

mod error;
pub use error::*;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::{Mutex, broadcast};

use crate::db::repository;
use crate::inventory::InventoryLedger;
use crate::orders::traits::{CartSource, Settlement, SettlementGateway};
use shared::models::{CartLine, Order, OrderLine, OrderStatus, PaymentMethod, PaymentStatus};
use shared::order::{CheckoutRequest, LifecycleEvent};
use shared::types::Actor;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Order lifecycle manager
pub struct OrderManager {
    pool: SqlitePool,
    ledger: InventoryLedger,
    cart: Arc<dyn CartSource>,
    gateway: Arc<dyn SettlementGateway>,
    event_tx: broadcast::Sender<LifecycleEvent>,
    /// Serializes status transitions. Cancellation releases stock and
    /// then flips the status; without the lock two concurrent cancels
    /// would both pass validation and both run the releases. The status
    /// write itself is additionally a compare-and-swap.
    transition_lock: Mutex<()>,
}

impl std::fmt::Debug for OrderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderManager")
            .field("ledger", &"<InventoryLedger>")
            .field("event_tx", &"<broadcast::Sender>")
            .finish()
    }
}

impl OrderManager {
    pub fn new(
        pool: SqlitePool,
        cart: Arc<dyn CartSource>,
        gateway: Arc<dyn SettlementGateway>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            ledger: InventoryLedger::new(pool.clone()),
            pool,
            cart,
            gateway,
            event_tx,
            transition_lock: Mutex::new(()),
        }
    }

    /// Subscribe to lifecycle event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.event_tx.subscribe()
    }

    /// The inventory ledger this manager reserves against
    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Convert the customer's cart into a persisted order
    pub async fn checkout(
        &self,
        customer_id: i64,
        request: CheckoutRequest,
    ) -> ManagerResult<Order> {
        let lines = self.cart.cart_lines(customer_id).await?;
        if lines.is_empty() {
            return Err(ManagerError::EmptyCart);
        }

        // Reserve in cart order so the compensation sequence is
        // deterministic. `reserved` only grows after a successful
        // reservation, which is exactly the set to undo on failure.
        let mut reserved: Vec<CartLine> = Vec::with_capacity(lines.len());
        for line in &lines {
            match self.ledger.reserve(line.product_id, line.quantity).await {
                Ok(()) => reserved.push(*line),
                Err(e) => {
                    tracing::info!(
                        customer_id,
                        product_id = line.product_id,
                        quantity = line.quantity,
                        "Checkout aborted at reservation, rolling back"
                    );
                    self.release_reserved(&reserved).await;
                    return Err(e.into());
                }
            }
        }

        // All lines are held; capture the price snapshot the order will
        // carry forever.
        let mut order_lines = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = match repository::product::find_by_id(&self.pool, line.product_id).await {
                Ok(Some(p)) => p,
                Ok(None) => {
                    self.release_reserved(&reserved).await;
                    return Err(ManagerError::ProductNotFound(line.product_id));
                }
                Err(e) => {
                    self.release_reserved(&reserved).await;
                    return Err(e.into());
                }
            };
            order_lines.push(OrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: product.unit_price,
            });
        }

        let order = match repository::order::create_order(
            &self.pool,
            customer_id,
            &request.shipping_address,
            &order_lines,
        )
        .await
        {
            Ok(order) => order,
            Err(e) => {
                // Storage fault after full reservation: undo everything
                // before surfacing it.
                self.release_reserved(&reserved).await;
                return Err(e.into());
            }
        };

        // Past the point of no return: the order stands even if the cart
        // clear or notification misbehaves.
        if let Err(e) = self.cart.clear_cart(customer_id).await {
            tracing::error!(
                customer_id,
                order_id = order.id,
                error = %e,
                "Cart clear failed after checkout; order stands"
            );
        }

        self.notify(LifecycleEvent::OrderCreated {
            order_id: order.id,
            customer_id,
            total: order.total,
        });
        tracing::info!(order_id = order.id, customer_id, total = %order.total, "Order created");
        Ok(order)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Fetch one order; owner or staff only
    pub async fn get_order(&self, order_id: i64, actor: &Actor) -> ManagerResult<Order> {
        let order = self.require_order(order_id).await?;
        if !actor.is_elevated() && !actor.owns(order.customer_id) {
            return Err(ManagerError::Forbidden);
        }
        Ok(order)
    }

    /// All orders for a customer, newest first
    pub async fn list_orders(&self, customer_id: i64) -> ManagerResult<Vec<Order>> {
        Ok(repository::order::find_by_customer(&self.pool, customer_id).await?)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Progress an order along the fulfilment path.
    ///
    /// Forward progression is staff-only. A `Cancelled` target delegates
    /// to [`cancel`](Self::cancel) so the stock-restoring path cannot be
    /// bypassed through the generic endpoint.
    pub async fn update_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
        actor: &Actor,
    ) -> ManagerResult<Order> {
        if new_status == OrderStatus::Cancelled {
            return self.cancel(order_id, actor).await;
        }

        let _guard = self.transition_lock.lock().await;

        let order = self.require_order(order_id).await?;
        if !actor.is_elevated() {
            return Err(ManagerError::Forbidden);
        }
        if !order.status.can_transition_to(new_status) {
            return Err(ManagerError::InvalidTransition {
                from: order.status,
                to: new_status,
            });
        }

        let updated = self
            .commit_transition(order_id, order.status, new_status)
            .await?;
        self.notify(LifecycleEvent::OrderStatusChanged {
            order_id,
            customer_id: updated.customer_id,
            from: order.status,
            to: new_status,
        });
        tracing::info!(order_id, from = %order.status, to = %new_status, "Order status updated");
        Ok(updated)
    }

    /// Cancel a pending order, restoring reserved stock.
    ///
    /// All releases are attempted first; the status flips to `Cancelled`
    /// only once every release has succeeded. A partial failure leaves
    /// the order `Pending` and reports `CancellationFailed` for operator
    /// reconciliation.
    ///
    /// Runs under the transition lock: exactly one caller passes the
    /// `Pending` check and runs the releases, so stock is returned once
    /// no matter how many cancels race.
    pub async fn cancel(&self, order_id: i64, actor: &Actor) -> ManagerResult<Order> {
        let _guard = self.transition_lock.lock().await;

        let order = self.require_order(order_id).await?;
        if !actor.is_elevated() && !actor.owns(order.customer_id) {
            return Err(ManagerError::Forbidden);
        }
        if !order.status.can_transition_to(OrderStatus::Cancelled) {
            return Err(ManagerError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            });
        }

        let mut failed_releases = 0usize;
        for item in &order.items {
            if let Err(e) = self.ledger.release(item.product_id, item.quantity).await {
                failed_releases += 1;
                tracing::error!(
                    order_id,
                    product_id = item.product_id,
                    quantity = item.quantity,
                    error = %e,
                    "Release failed during cancellation"
                );
            }
        }
        if failed_releases > 0 {
            return Err(ManagerError::CancellationFailed {
                order_id,
                failed_releases,
            });
        }

        let updated = self
            .commit_transition(order_id, OrderStatus::Pending, OrderStatus::Cancelled)
            .await?;
        self.notify(LifecycleEvent::OrderCancelled {
            order_id,
            customer_id: updated.customer_id,
        });
        tracing::info!(order_id, "Order cancelled, stock restored");
        Ok(updated)
    }

    // =========================================================================
    // Settlement
    // =========================================================================

    /// Settle a pending order through the payment gateway. Owner only.
    ///
    /// On success the attempt is recorded and the order advances
    /// `Pending → Processing`; on gateway failure the attempt is recorded
    /// and the order stays `Pending`.
    pub async fn pay(
        &self,
        order_id: i64,
        method: PaymentMethod,
        actor: &Actor,
    ) -> ManagerResult<Order> {
        let _guard = self.transition_lock.lock().await;

        let order = self.require_order(order_id).await?;
        if !actor.owns(order.customer_id) {
            return Err(ManagerError::Forbidden);
        }
        if order.status != OrderStatus::Pending {
            return Err(ManagerError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Processing,
            });
        }

        match self.gateway.settle(order_id, order.total, method).await {
            Settlement::Settled { transaction_id } => {
                repository::payment::record(
                    &self.pool,
                    order_id,
                    method,
                    order.total,
                    PaymentStatus::Completed,
                    Some(&transaction_id),
                )
                .await?;
                let updated = self
                    .commit_transition(order_id, OrderStatus::Pending, OrderStatus::Processing)
                    .await?;
                self.notify(LifecycleEvent::OrderStatusChanged {
                    order_id,
                    customer_id: updated.customer_id,
                    from: OrderStatus::Pending,
                    to: OrderStatus::Processing,
                });
                tracing::info!(order_id, transaction_id, "Order settled");
                Ok(updated)
            }
            Settlement::Failed { reason } => {
                repository::payment::record(
                    &self.pool,
                    order_id,
                    method,
                    order.total,
                    PaymentStatus::Failed,
                    None,
                )
                .await?;
                tracing::warn!(order_id, reason, "Settlement failed");
                Err(ManagerError::SettlementFailed(reason))
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn require_order(&self, order_id: i64) -> ManagerResult<Order> {
        repository::order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(ManagerError::OrderNotFound(order_id))
    }

    /// Commit a validated transition through the repository's
    /// compare-and-swap. Callers hold the transition lock, so a lost swap
    /// should not occur; it still maps to `InvalidTransition` against the
    /// freshly read status rather than a silent overwrite.
    async fn commit_transition(
        &self,
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> ManagerResult<Order> {
        match repository::order::transition_status(&self.pool, order_id, from, to).await? {
            Some(order) => Ok(order),
            None => {
                let current = self.require_order(order_id).await?;
                tracing::warn!(order_id, from = %from, to = %to, current = %current.status, "Status swap lost a race");
                Err(ManagerError::InvalidTransition {
                    from: current.status,
                    to,
                })
            }
        }
    }

    /// Compensating rollback for a partially reserved checkout.
    ///
    /// Best effort per line: a failed release here is already a fault
    /// path, so it is logged for reconciliation rather than propagated.
    async fn release_reserved(&self, reserved: &[CartLine]) {
        for line in reserved {
            if let Err(e) = self.ledger.release(line.product_id, line.quantity).await {
                tracing::error!(
                    product_id = line.product_id,
                    quantity = line.quantity,
                    error = %e,
                    "Compensating release failed; stock needs manual reconciliation"
                );
            }
        }
    }

    fn notify(&self, event: LifecycleEvent) {
        // Fire-and-forget: an Err only means there are no subscribers.
        let _ = self.event_tx.send(event);
    }
}
