//! Repository Module
//!
//! Free functions over `&SqlitePool`, one module per table. Repositories
//! stay a dumb persistence boundary: no cross-table orchestration, no
//! business validation — that belongs to the order manager.

pub mod cart;
pub mod order;
pub mod payment;
pub mod product;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            other => RepoError::Database(other.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse a TEXT money column into a Decimal
pub(crate) fn parse_decimal(column: &str, raw: &str) -> RepoResult<rust_decimal::Decimal> {
    raw.parse()
        .map_err(|e| RepoError::Database(format!("Bad decimal in column {column}: {e}")))
}
