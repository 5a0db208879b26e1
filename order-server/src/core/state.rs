use std::sync::Arc;

use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderManager;
use crate::services::{DbCartSource, MockSettlementGateway};
use crate::utils::AppError;

/// Shared server state
///
/// Holds the connection pool and the order manager behind `Arc`, so
/// cloning into handlers and background tasks is cheap.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub orders: Arc<OrderManager>,
}

impl ServerState {
    /// Open the database and wire the order manager to its collaborators
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_path = config.db_path();
        let db_path = db_path
            .to_str()
            .ok_or_else(|| AppError::Internal("Non-UTF8 work dir".to_string()))?;
        let db = DbService::new(db_path).await?;

        let orders = Arc::new(OrderManager::new(
            db.pool.clone(),
            Arc::new(DbCartSource::new(db.pool.clone())),
            Arc::new(MockSettlementGateway),
        ));

        Ok(Self {
            config: config.clone(),
            db,
            orders,
        })
    }

    /// Log every lifecycle event until the process exits.
    ///
    /// The subscription keeps the broadcast channel drained even with no
    /// external consumers attached.
    pub fn start_event_logger(&self) {
        let mut rx = self.orders.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        tracing::info!(order_id = event.order_id(), ?event, "Lifecycle event")
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Event logger lagged behind")
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}
