//! Products domain module.
//!
//! Business rules for product entries, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage): the entry validator, the product
//! record, the aggregate query model the stores answer, and the statistics
//! records built from those aggregates.

pub mod product;
pub mod query;
pub mod stats;
pub mod validation;

pub use product::{NewProduct, Price, Product, ProductName};
pub use query::{ProductAggregate, ProductFilter};
pub use stats::{
    ConditionalSum, ConditionalSumBranch, ConditionalSumPolicy, GlobalSummary, StatsReport,
    UserSummary, PRICE_BUMP,
};
pub use validation::{
    parse_entry, validate_entry, Field, ValidEntry, ValidationError, ValidationErrorKind,
    ValidationErrors,
};
