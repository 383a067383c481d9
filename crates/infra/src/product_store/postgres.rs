//! Postgres-backed product store.
//!
//! Aggregates are a single `SELECT COUNT/SUM/MAX/AVG` with optional
//! predicates (`$n::type IS NULL OR ...`), so one statement answers every
//! filter combination from one snapshot. Bumps are a single `UPDATE`; a
//! result outside `NUMERIC(5,2)` fails the whole statement with SQLSTATE
//! `22003`, which surfaces as [`StoreError::PriceOverflow`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{Span, instrument};

use pricestats_core::{ProductId, UserId};
use pricestats_products::{NewProduct, Product, ProductAggregate, ProductFilter};

use super::r#trait::ProductStore;
use crate::error::{StoreError, map_sqlx_error};

#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_product", e);

    let id: i64 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let price: Decimal = row.try_get("price").map_err(decode)?;
    let owner: Option<i64> = row.try_get("owner_id").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

    Ok(Product::restore(
        ProductId::from_i64(id),
        name,
        price,
        owner.map(UserId::from_i64),
        created_at,
    ))
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, product), fields(owner = ?product.owner), err)]
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, price, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, owner_id, created_at
            "#,
        )
        .bind(product.name.as_str())
        .bind(product.price.as_decimal())
        .bind(product.owner.map(|o| o.as_i64()))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), fields(count = tracing::field::Empty), err)]
    async fn aggregate(&self, filter: ProductFilter) -> Result<ProductAggregate, StoreError> {
        let owner: Option<i64> = filter.owner.map(|o| o.as_i64());
        let name_len_gt: Option<i64> = filter
            .name_len_gt
            .map(|n| i64::try_from(n).unwrap_or(i64::MAX));

        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*)   AS count,
                SUM(price) AS sum,
                MAX(price) AS max,
                AVG(price) AS avg
            FROM products
            WHERE ($1::bigint IS NULL OR owner_id = $1)
                AND ($2::bigint IS NULL OR char_length(name) > $2)
                AND ($3::numeric IS NULL OR price > $3)
            "#,
        )
        .bind(owner)
        .bind(name_len_gt)
        .bind(filter.price_gt)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("aggregate_products", e))?;

        let decode = |e: sqlx::Error| map_sqlx_error("decode_aggregate", e);
        let count: i64 = row.try_get("count").map_err(decode)?;
        let count = u64::try_from(count)
            .map_err(|_| StoreError::Corrupt(format!("negative row count {count}")))?;

        Span::current().record("count", count);

        Ok(ProductAggregate {
            count,
            sum: row.try_get("sum").map_err(decode)?,
            max: row.try_get("max").map_err(decode)?,
            avg: row.try_get("avg").map_err(decode)?,
        })
    }

    #[instrument(skip(self), fields(owner = %owner, changed = tracing::field::Empty), err)]
    async fn increment_prices(&self, owner: UserId, delta: Decimal) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET price = price + $2
            WHERE owner_id = $1
            "#,
        )
        .bind(owner.as_i64())
        .bind(delta)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("increment_prices", e))?;

        let changed = result.rows_affected();
        Span::current().record("changed", changed);
        Ok(changed)
    }
}
