use std::sync::Arc;

use rust_decimal::Decimal;

use pricestats_core::UserId;
use pricestats_products::{NewProduct, Product, ProductAggregate, ProductFilter};

use crate::error::StoreError;

/// Product table boundary.
///
/// Every method is one store operation: `aggregate` computes all of its
/// fields from one snapshot, and `increment_prices` either changes every
/// matching row or none of them.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a validated entry; the store assigns `id` and `created_at`.
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// COUNT / SUM / MAX / AVG of `price` over the rows matching `filter`.
    async fn aggregate(&self, filter: ProductFilter) -> Result<ProductAggregate, StoreError>;

    /// Add `delta` to the price of every product `owner` owns.
    ///
    /// Returns the number of rows changed (0 when the owner has none).
    async fn increment_prices(&self, owner: UserId, delta: Decimal) -> Result<u64, StoreError>;
}

#[async_trait::async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        (**self).insert(product).await
    }

    async fn aggregate(&self, filter: ProductFilter) -> Result<ProductAggregate, StoreError> {
        (**self).aggregate(filter).await
    }

    async fn increment_prices(&self, owner: UserId, delta: Decimal) -> Result<u64, StoreError> {
        (**self).increment_prices(owner, delta).await
    }
}
