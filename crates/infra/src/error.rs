//! Store error type shared by every backend.
//!
//! ## Postgres mapping
//!
//! | SQLx error | SQLSTATE | `StoreError` | Scenario |
//! |------------|----------|--------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | duplicate username / session token |
//! | Database (numeric value out of range) | `22003` | `PriceOverflow` | price bump past `NUMERIC(5,2)` |
//! | Database (other) | any other | `Unavailable` | |
//! | ColumnDecode / Decode | N/A | `Corrupt` | row does not match the expected shape |
//! | PoolClosed / Io / other | N/A | `Unavailable` | network errors, pool shut down |

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("price overflow: {0}")]
    PriceOverflow(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub(crate) fn lock_poisoned() -> Self {
        StoreError::Unavailable("lock poisoned".to_string())
    }
}

/// Map a sqlx error raised by `operation` onto [`StoreError`].
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("22003") => StoreError::PriceOverflow(msg),
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Corrupt(format!("undecodable row in {}: {}", operation, err))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}
