//! Cart Repository
//!
//! One row per (customer, product); adding the same product again
//! accumulates quantity.

use super::{RepoError, RepoResult};
use shared::models::CartItem;
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// All cart items for a customer, oldest first (cart insertion order)
pub async fn items_for_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<CartItem>> {
    let items = sqlx::query_as::<_, CartItem>(
        "SELECT id, customer_id, product_id, quantity, created_at, updated_at \
         FROM cart_items WHERE customer_id = ? ORDER BY created_at, id",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Add a product to the cart (upsert: quantity accumulates)
pub async fn add_item(
    pool: &SqlitePool,
    customer_id: i64,
    product_id: i64,
    quantity: i32,
) -> RepoResult<CartItem> {
    if quantity <= 0 {
        return Err(RepoError::Validation("quantity must be positive".into()));
    }

    let now = now_millis();
    sqlx::query(
        "INSERT INTO cart_items (id, customer_id, product_id, quantity, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?) \
         ON CONFLICT (customer_id, product_id) \
         DO UPDATE SET quantity = quantity + excluded.quantity, updated_at = excluded.updated_at",
    )
    .bind(snowflake_id())
    .bind(customer_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let item = sqlx::query_as::<_, CartItem>(
        "SELECT id, customer_id, product_id, quantity, created_at, updated_at \
         FROM cart_items WHERE customer_id = ? AND product_id = ?",
    )
    .bind(customer_id)
    .bind(product_id)
    .fetch_one(pool)
    .await?;
    Ok(item)
}

/// Overwrite the quantity of a cart item owned by the customer
pub async fn update_quantity(
    pool: &SqlitePool,
    customer_id: i64,
    item_id: i64,
    quantity: i32,
) -> RepoResult<CartItem> {
    if quantity <= 0 {
        return Err(RepoError::Validation("quantity must be positive".into()));
    }

    let rows = sqlx::query(
        "UPDATE cart_items SET quantity = ?, updated_at = ? WHERE id = ? AND customer_id = ?",
    )
    .bind(quantity)
    .bind(now_millis())
    .bind(item_id)
    .bind(customer_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cart item {item_id} not found")));
    }

    let item = sqlx::query_as::<_, CartItem>(
        "SELECT id, customer_id, product_id, quantity, created_at, updated_at \
         FROM cart_items WHERE id = ?",
    )
    .bind(item_id)
    .fetch_one(pool)
    .await?;
    Ok(item)
}

/// Remove one cart item owned by the customer
pub async fn remove_item(pool: &SqlitePool, customer_id: i64, item_id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM cart_items WHERE id = ? AND customer_id = ?")
        .bind(item_id)
        .bind(customer_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cart item {item_id} not found")));
    }
    Ok(())
}

/// Remove everything in the customer's cart
pub async fn clear(pool: &SqlitePool, customer_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM cart_items WHERE customer_id = ?")
        .bind(customer_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn adding_the_same_product_accumulates_quantity() {
        let db = DbService::open_in_memory().await.unwrap();
        add_item(&db.pool, 7, 11, 2).await.unwrap();
        let item = add_item(&db.pool, 7, 11, 3).await.unwrap();
        assert_eq!(item.quantity, 5);

        let items = items_for_customer(&db.pool, 7).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn items_are_scoped_to_their_owner() {
        let db = DbService::open_in_memory().await.unwrap();
        let item = add_item(&db.pool, 7, 11, 2).await.unwrap();
        add_item(&db.pool, 8, 11, 1).await.unwrap();

        // Another customer cannot touch it
        let err = update_quantity(&db.pool, 8, item.id, 9).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
        assert!(remove_item(&db.pool, 8, item.id).await.is_err());

        clear(&db.pool, 7).await.unwrap();
        assert!(items_for_customer(&db.pool, 7).await.unwrap().is_empty());
        assert_eq!(items_for_customer(&db.pool, 8).await.unwrap().len(), 1);
    }
}
