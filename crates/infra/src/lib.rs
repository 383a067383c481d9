//! Infrastructure layer: stores, schema bootstrap, config, statistics services.

pub mod account_store;
pub mod config;
pub mod error;
pub mod product_store;
pub mod schema;
pub mod stats;

#[cfg(test)]
mod integration_tests;

pub use account_store::{AccountStore, InMemoryAccountStore, PostgresAccountStore};
pub use config::{ConfigError, Settings};
pub use error::StoreError;
pub use product_store::{InMemoryProductStore, PostgresProductStore, ProductStore};
pub use schema::ensure_schema;
pub use stats::{PriceAdjuster, StatsService};
