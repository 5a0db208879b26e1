//! Simulated settlement gateway
//!
//! Stands in for a real payment provider: every settlement attempt
//! succeeds and is stamped with a synthetic transaction id. Swap in a
//! real `SettlementGateway` implementation to integrate a provider.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::orders::traits::{Settlement, SettlementGateway};
use shared::models::PaymentMethod;
use shared::util::now_millis;

#[derive(Debug, Default, Clone)]
pub struct MockSettlementGateway;

#[async_trait]
impl SettlementGateway for MockSettlementGateway {
    async fn settle(&self, order_id: i64, amount: Decimal, method: PaymentMethod) -> Settlement {
        let transaction_id = format!("TXN-{}-{}", order_id, now_millis());
        tracing::debug!(order_id, %amount, method = method.as_str(), transaction_id, "Simulated settlement");
        Settlement::Settled { transaction_id }
    }
}
