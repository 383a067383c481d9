//! Bootstrap DDL for the Postgres backend.

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::error::{StoreError, map_sqlx_error};

/// Idempotent statements creating every table the Postgres stores use.
///
/// `products.owner_id` is nullable and set to NULL when the owning account is
/// deleted; sessions go away with their account.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            BIGSERIAL PRIMARY KEY,
        username      VARCHAR(150) NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        is_active     BOOLEAN NOT NULL DEFAULT TRUE,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id         BIGSERIAL PRIMARY KEY,
        name       VARCHAR(100) NOT NULL,
        price      NUMERIC(5, 2) NOT NULL,
        owner_id   BIGINT REFERENCES users (id) ON DELETE SET NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS products_owner_id_idx ON products (owner_id)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id         TEXT PRIMARY KEY,
        user_id    BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL,
        expires_at TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Create missing tables in one transaction.
#[instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| map_sqlx_error("ensure_schema_begin", e))?;

    for &statement in SCHEMA {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }

    tx.commit()
        .await
        .map_err(|e| map_sqlx_error("ensure_schema_commit", e))?;

    info!(statements = SCHEMA.len(), "database schema ensured");
    Ok(())
}
