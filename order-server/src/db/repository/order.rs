//! Order Repository (aggregate store)
//!
//! Persists Order + OrderItem as one atomic unit; partial orders are
//! never observable. Transition legality is deliberately absent here —
//! `transition_status` is a bare compare-and-swap, the lifecycle manager
//! owns the rules.

use super::{RepoError, RepoResult, parse_decimal};
use rust_decimal::Decimal;
use shared::models::{Order, OrderItem, OrderLine, OrderStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    status: String,
    total: String,
    shipping_address: String,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i32,
    unit_price: String,
    position: i32,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> RepoResult<Order> {
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|e| RepoError::Database(format!("Bad status for order {}: {e}", self.id)))?;
        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            status,
            total: parse_decimal("total", &self.total)?,
            shipping_address: self.shipping_address,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepoError;

    fn try_from(row: OrderItemRow) -> RepoResult<OrderItem> {
        Ok(OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: parse_decimal("unit_price", &row.unit_price)?,
            position: row.position,
        })
    }
}

/// Create an order with all its items in a single transaction.
///
/// `lines` carry the already-reserved quantities and the price snapshot
/// taken at checkout; line order becomes item `position`.
pub async fn create_order(
    pool: &SqlitePool,
    customer_id: i64,
    shipping_address: &str,
    lines: &[OrderLine],
) -> RepoResult<Order> {
    if lines.is_empty() {
        return Err(RepoError::Validation("order must have at least one line".into()));
    }

    let total: Decimal = lines
        .iter()
        .map(|l| l.unit_price * Decimal::from(l.quantity))
        .sum();

    let order_id = snowflake_id();
    let now = now_millis();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders (id, customer_id, status, total, shipping_address, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order_id)
    .bind(customer_id)
    .bind(OrderStatus::Pending.as_str())
    .bind(total.to_string())
    .bind(shipping_address)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for (position, line) in lines.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, quantity, unit_price, position) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price.to_string())
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to read order after insert".into()))
}

/// Find an order with its items (item insertion order preserved)
pub async fn find_by_id(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<Order>> {
    let Some(row) = sqlx::query_as::<_, OrderRow>(
        "SELECT id, customer_id, status, total, shipping_address, created_at, updated_at \
         FROM orders WHERE id = ?",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let items = items_for_order(pool, order_id).await?;
    Ok(Some(row.into_order(items)?))
}

/// All orders for a customer, newest first
pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT id, customer_id, status, total, shipping_address, created_at, updated_at \
         FROM orders WHERE customer_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = items_for_order(pool, row.id).await?;
        orders.push(row.into_order(items)?);
    }
    Ok(orders)
}

/// Compare-and-swap the status and bump `updated_at`.
///
/// The guard (`status = from`) and the write execute as one statement, so
/// two racing transitions out of the same state can never both commit.
/// `Ok(None)` means the order exists but its status no longer matches
/// `from`; the caller decides what a lost race means.
pub async fn transition_status(
    pool: &SqlitePool,
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<Option<Order>> {
    let rows =
        sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
            .bind(to.as_str())
            .bind(now_millis())
            .bind(order_id)
            .bind(from.as_str())
            .execute(pool)
            .await?;

    if rows.rows_affected() == 0 {
        // Distinguish a lost race from a missing order
        return match find_by_id(pool, order_id).await? {
            Some(_) => Ok(None),
            None => Err(RepoError::NotFound(format!("Order {order_id} not found"))),
        };
    }
    find_by_id(pool, order_id)
        .await?
        .map(Some)
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

async fn items_for_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItemRow>(
        "SELECT id, order_id, product_id, quantity, unit_price, position \
         FROM order_items WHERE order_id = ? ORDER BY position",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(OrderItem::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn line(product_id: i64, quantity: i32, price: &str) -> OrderLine {
        OrderLine {
            product_id,
            quantity,
            unit_price: price.parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn aggregate_round_trips_with_item_order_preserved() {
        let db = DbService::open_in_memory().await.unwrap();
        let lines = [line(11, 2, "4.50"), line(22, 1, "29.99"), line(33, 3, "0.10")];

        let order = create_order(&db.pool, 7, "1 High Street", &lines)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, "39.29".parse::<Decimal>().unwrap());

        let fetched = find_by_id(&db.pool, order.id).await.unwrap().unwrap();
        assert_eq!(fetched.items.len(), 3);
        for (position, item) in fetched.items.iter().enumerate() {
            assert_eq!(item.position, position as i32);
            assert_eq!(item.product_id, lines[position].product_id);
            assert_eq!(item.unit_price, lines[position].unit_price);
        }
    }

    #[tokio::test]
    async fn empty_line_set_is_rejected() {
        let db = DbService::open_in_memory().await.unwrap();
        let err = create_order(&db.pool, 7, "1 High Street", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn transition_on_missing_order_is_not_found() {
        let db = DbService::open_in_memory().await.unwrap();
        let err = transition_status(&db.pool, 4242, OrderStatus::Pending, OrderStatus::Processing)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn transition_from_stale_status_does_not_write() {
        let db = DbService::open_in_memory().await.unwrap();
        let order = create_order(&db.pool, 7, "1 High Street", &[line(11, 1, "4.50")])
            .await
            .unwrap();

        let won = transition_status(&db.pool, order.id, OrderStatus::Pending, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(won.unwrap().status, OrderStatus::Cancelled);

        // Same guard again: the status moved on, so the swap must refuse
        let lost = transition_status(&db.pool, order.id, OrderStatus::Pending, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert!(lost.is_none());
        let current = find_by_id(&db.pool, order.id).await.unwrap().unwrap();
        assert_eq!(current.status, OrderStatus::Cancelled);
    }
}
