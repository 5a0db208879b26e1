//! Product Repository
//!
//! Catalog reads plus the few writes this server owns. Stock is absent
//! here on purpose: only the inventory ledger may touch it.

use super::{RepoError, RepoResult, parse_decimal};
use shared::models::Product;
use shared::models::product::ProductCreate;
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    unit_price: String,
    stock: i32,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepoError;

    fn try_from(row: ProductRow) -> RepoResult<Product> {
        Ok(Product {
            id: row.id,
            name: row.name,
            unit_price: parse_decimal("unit_price", &row.unit_price)?,
            stock: row.stock,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, name, unit_price, stock, is_active, created_at, updated_at";

/// Create a new product
pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    if data.stock < 0 {
        return Err(RepoError::Validation("stock cannot be negative".into()));
    }
    if data.unit_price.is_sign_negative() {
        return Err(RepoError::Validation("unit_price cannot be negative".into()));
    }

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO products (id, name, unit_price, stock, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.unit_price.to_string())
    .bind(data.stock)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to read product after insert".into()))
}

/// Find product by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM products WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(Product::try_from).transpose()
}

/// Find all active products, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Product::try_from).collect()
}

/// Update the list price.
///
/// Existing orders are unaffected: they carry their own price snapshot.
pub async fn set_price(
    pool: &SqlitePool,
    id: i64,
    unit_price: rust_decimal::Decimal,
) -> RepoResult<Product> {
    if unit_price.is_sign_negative() {
        return Err(RepoError::Validation("unit_price cannot be negative".into()));
    }

    let rows = sqlx::query("UPDATE products SET unit_price = ?, updated_at = ? WHERE id = ?")
        .bind(unit_price.to_string())
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}
