//! Entry validator: turns a candidate `(name, price)` pair into a [`ValidEntry`].
//!
//! Pure functions only. Every failing field is reported (one error per field,
//! the first rule it breaks), so the caller can show all field messages at once.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::product::{Price, ProductName};

/// Form field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Price,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Price => "price",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationErrorKind {
    #[error("this field is required")]
    Required,

    #[error("must contain at least {min} characters")]
    TooShort { min: usize },

    #[error("must contain at most {max} characters")]
    TooLong { max: usize },

    #[error("enter a number")]
    NotANumber,

    #[error("must be greater than 0")]
    NotPositive,

    #[error("no more than {max} decimal places allowed")]
    TooManyDecimalPlaces { max: u32 },

    #[error("no more than {max} digits in total allowed")]
    TooManyDigits { max: u32 },
}

/// A single field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {kind}")]
pub struct ValidationError {
    pub field: Field,
    pub kind: ValidationErrorKind,
}

/// All field-level failures of one submission (never empty).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid product entry ({} field error(s))", .0.len())]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// First error reported for `field`, if any.
    pub fn for_field(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.for_field(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The validated `(name, price)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry {
    pub name: ProductName,
    pub price: Price,
}

/// Validate a typed candidate entry.
pub fn validate_entry(name: &str, price: Decimal) -> Result<ValidEntry, ValidationErrors> {
    collect(ProductName::parse(name), Price::new(price))
}

/// Validate raw form input (the price still has to be parsed).
pub fn parse_entry(name: &str, price: &str) -> Result<ValidEntry, ValidationErrors> {
    let price = match price.trim() {
        "" => Err(ValidationErrorKind::Required),
        raw => Decimal::from_str(raw)
            .map_err(|_| ValidationErrorKind::NotANumber)
            .and_then(Price::new),
    };
    collect(ProductName::parse(name), price)
}

fn collect(
    name: Result<ProductName, ValidationErrorKind>,
    price: Result<Price, ValidationErrorKind>,
) -> Result<ValidEntry, ValidationErrors> {
    match (name, price) {
        (Ok(name), Ok(price)) => Ok(ValidEntry { name, price }),
        (name, price) => {
            let mut errors = Vec::with_capacity(2);
            if let Err(kind) = name {
                errors.push(ValidationError {
                    field: Field::Name,
                    kind,
                });
            }
            if let Err(kind) = price {
                errors.push(ValidationError {
                    field: Field::Price,
                    kind,
                });
            }
            Err(ValidationErrors(errors))
        }
    }
}
