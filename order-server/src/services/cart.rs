//! Cart-backed `CartSource`
//!
//! Adapts the cart repository to the seam the order manager consumes.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, cart};
use crate::orders::traits::CartSource;
use shared::models::CartLine;

#[derive(Clone)]
pub struct DbCartSource {
    pool: SqlitePool,
}

impl DbCartSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartSource for DbCartSource {
    async fn cart_lines(&self, customer_id: i64) -> RepoResult<Vec<CartLine>> {
        let items = cart::items_for_customer(&self.pool, customer_id).await?;
        Ok(items.iter().map(CartLine::from).collect())
    }

    async fn clear_cart(&self, customer_id: i64) -> RepoResult<()> {
        cart::clear(&self.pool, customer_id).await
    }
}
