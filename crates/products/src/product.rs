use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pricestats_core::{Entity, ProductId, UserId, ValueObject};

use crate::validation::ValidationErrorKind;

/// Minimum number of characters in a product name.
pub const NAME_MIN_CHARS: usize = 2;

/// Maximum number of characters in a product name (column width).
pub const NAME_MAX_CHARS: usize = 100;

/// Fractional digits kept for prices (`NUMERIC(5, 2)`).
pub const PRICE_SCALE: u32 = 2;

/// Total significant digits allowed for prices (`NUMERIC(5, 2)`).
pub const PRICE_MAX_DIGITS: u32 = 5;

/// Largest price the column can hold (`999.99`).
pub fn max_price() -> Decimal {
    Decimal::new(99_999, PRICE_SCALE)
}

/// Validated product name.
///
/// Surrounding whitespace is stripped before the length rules apply; lengths
/// count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductName(String);

impl ProductName {
    pub fn parse(raw: &str) -> Result<Self, ValidationErrorKind> {
        let name = raw.trim();
        let chars = name.chars().count();

        if chars == 0 {
            return Err(ValidationErrorKind::Required);
        }
        if chars > NAME_MAX_CHARS {
            return Err(ValidationErrorKind::TooLong { max: NAME_MAX_CHARS });
        }
        if chars < NAME_MIN_CHARS {
            return Err(ValidationErrorKind::TooShort { min: NAME_MIN_CHARS });
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for ProductName {}

impl core::fmt::Display for ProductName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated, strictly positive price normalized to two fractional digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Result<Self, ValidationErrorKind> {
        if value <= Decimal::ZERO {
            return Err(ValidationErrorKind::NotPositive);
        }

        let normalized = value.normalize();
        if normalized.scale() > PRICE_SCALE {
            return Err(ValidationErrorKind::TooManyDecimalPlaces { max: PRICE_SCALE });
        }
        if normalized > max_price() {
            return Err(ValidationErrorKind::TooManyDigits {
                max: PRICE_MAX_DIGITS,
            });
        }

        let mut scaled = normalized;
        scaled.rescale(PRICE_SCALE);
        Ok(Self(scaled))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl ValueObject for Price {}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// A validated entry ready to be inserted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: ProductName,
    pub price: Price,
    pub owner: Option<UserId>,
}

/// Stored product record.
///
/// Storage does not re-check the entry rules: `name`/`price` are whatever the
/// store holds (the validator runs before insert, the adjuster only raises
/// prices afterwards).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Decimal,
    owner: Option<UserId>,
    created_at: DateTime<Utc>,
}

impl Product {
    /// Rehydrate a record read back from a store.
    pub fn restore(
        id: ProductId,
        name: String,
        price: Decimal,
        owner: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            price,
            owner,
            created_at,
        }
    }

    /// Materialize a new entry under a store-assigned id and timestamp.
    pub fn from_new(id: ProductId, new: NewProduct, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name.into_inner(),
            price: new.price.as_decimal(),
            owner: new.owner,
            created_at,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name length in characters (what the name-length filters compare).
    pub fn name_len(&self) -> usize {
        self.name.chars().count()
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == Some(user)
    }

    /// Price after adding `delta`, or `None` if the column could not hold it.
    pub fn bumped_price(&self, delta: Decimal) -> Option<Decimal> {
        let next = self.price.checked_add(delta)?;
        (next <= max_price()).then_some(next)
    }

    /// Overwrite the price. Only the price adjuster path calls this.
    pub fn set_price(&mut self, price: Decimal) {
        self.price = price;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
