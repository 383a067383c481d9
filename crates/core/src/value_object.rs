//! Value object trait: equality by value, not identity.
//!
//! Value objects have no identity; they are defined entirely by their attribute
//! values. In this workspace they also carry their own validation: a value object
//! can only be constructed from input that satisfies its invariants, so holding
//! one is proof the check already ran.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: no identity (`Price(90.00)` equals any other `Price(90.00)`)
/// - **Entity**: has identity (two products with the same id are the same product)
///
/// ## Usage Pattern
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Price(Decimal);
///
/// impl ValueObject for Price {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
