//! Payment Repository
//!
//! Append-only record of settlement attempts, completed or failed.

use super::{RepoError, RepoResult, parse_decimal};
use rust_decimal::Decimal;
use shared::models::{Payment, PaymentMethod, PaymentStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    order_id: i64,
    method: String,
    amount: String,
    status: String,
    transaction_id: Option<String>,
    created_at: i64,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RepoError;

    fn try_from(row: PaymentRow) -> RepoResult<Payment> {
        let method = match row.method.as_str() {
            "credit_card" => PaymentMethod::CreditCard,
            "debit_card" => PaymentMethod::DebitCard,
            "paypal" => PaymentMethod::Paypal,
            "bank_transfer" => PaymentMethod::BankTransfer,
            other => {
                return Err(RepoError::Database(format!("Bad payment method: {other}")));
            }
        };
        let status = match row.status.as_str() {
            "completed" => PaymentStatus::Completed,
            "failed" => PaymentStatus::Failed,
            other => {
                return Err(RepoError::Database(format!("Bad payment status: {other}")));
            }
        };
        Ok(Payment {
            id: row.id,
            order_id: row.order_id,
            method,
            amount: parse_decimal("amount", &row.amount)?,
            status,
            transaction_id: row.transaction_id,
            created_at: row.created_at,
        })
    }
}

/// Record a settlement attempt
pub async fn record(
    pool: &SqlitePool,
    order_id: i64,
    method: PaymentMethod,
    amount: Decimal,
    status: PaymentStatus,
    transaction_id: Option<&str>,
) -> RepoResult<Payment> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO payments (id, order_id, method, amount, status, transaction_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(order_id)
    .bind(method.as_str())
    .bind(amount.to_string())
    .bind(status.as_str())
    .bind(transaction_id)
    .bind(now_millis())
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, PaymentRow>(
        "SELECT id, order_id, method, amount, status, transaction_id, created_at \
         FROM payments WHERE id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Payment::try_from(row)
}

/// All settlement attempts for an order, oldest first
pub async fn for_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<Payment>> {
    let rows = sqlx::query_as::<_, PaymentRow>(
        "SELECT id, order_id, method, amount, status, transaction_id, created_at \
         FROM payments WHERE order_id = ? ORDER BY created_at, id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Payment::try_from).collect()
}
