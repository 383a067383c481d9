//! Product storage: one trait, an in-memory backend for tests/dev and a
//! Postgres backend for deployments.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::ProductStore;
