use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;
use rust_decimal::Decimal;

use pricestats_core::{ProductId, UserId};
use pricestats_products::{NewProduct, Product, ProductAggregate, ProductFilter};

use super::r#trait::ProductStore;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<ProductId, Product>,
}

/// In-memory product table.
///
/// Intended for tests/dev. One `RwLock` guards the whole table, so each
/// aggregate is computed under a single read guard and each bump under a
/// single write guard.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    table: RwLock<Table>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut table = self.table.write().map_err(|_| StoreError::lock_poisoned())?;

        table.next_id += 1;
        let id = ProductId::from_i64(table.next_id);
        let stored = Product::from_new(id, product, Utc::now());
        table.rows.insert(id, stored.clone());

        Ok(stored)
    }

    async fn aggregate(&self, filter: ProductFilter) -> Result<ProductAggregate, StoreError> {
        let table = self.table.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(ProductAggregate::over(table.rows.values(), &filter))
    }

    async fn increment_prices(&self, owner: UserId, delta: Decimal) -> Result<u64, StoreError> {
        let mut table = self.table.write().map_err(|_| StoreError::lock_poisoned())?;

        // Compute every new price first so an overflow leaves the table untouched.
        let mut updates = Vec::new();
        for product in table.rows.values().filter(|p| p.is_owned_by(owner)) {
            let next = product.bumped_price(delta).ok_or_else(|| {
                StoreError::PriceOverflow(format!(
                    "product {} price {} + {} exceeds column precision",
                    product.id_typed(),
                    product.price(),
                    delta
                ))
            })?;
            updates.push((product.id_typed(), next));
        }

        for (id, price) in &updates {
            if let Some(product) = table.rows.get_mut(id) {
                product.set_price(*price);
            }
        }

        Ok(updates.len() as u64)
    }
}
