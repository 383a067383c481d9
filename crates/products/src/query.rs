//! Aggregate query model answered by product stores.
//!
//! Statistics are expressed as *one* filter plus *one* aggregate record so that
//! any backend (in-memory map, SQL table) can satisfy them, and so that every
//! field of a result comes from the same snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pricestats_core::UserId;

use crate::product::Product;

/// Conjunction of optional predicates over stored products.
///
/// An unset predicate matches everything. `owner` never matches orphaned
/// products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub owner: Option<UserId>,
    /// Keep products whose name has strictly more characters than this.
    pub name_len_gt: Option<usize>,
    /// Keep products whose price is strictly greater than this.
    pub price_gt: Option<Decimal>,
}

impl ProductFilter {
    /// Matches every product.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn owned_by(owner: UserId) -> Self {
        Self {
            owner: Some(owner),
            ..Self::default()
        }
    }

    pub fn name_longer_than(mut self, chars: usize) -> Self {
        self.name_len_gt = Some(chars);
        self
    }

    pub fn price_above(mut self, price: Decimal) -> Self {
        self.price_gt = Some(price);
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(owner) = self.owner {
            if !product.is_owned_by(owner) {
                return false;
            }
        }
        if let Some(len) = self.name_len_gt {
            if product.name_len() <= len {
                return false;
            }
        }
        if let Some(price) = self.price_gt {
            if product.price() <= price {
                return false;
            }
        }
        true
    }
}

/// COUNT / SUM / MAX / AVG of `price` over the rows matching one filter.
///
/// `sum`, `max` and `avg` are `None` over an empty set; `count` is then 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAggregate {
    pub count: u64,
    pub sum: Option<Decimal>,
    pub max: Option<Decimal>,
    pub avg: Option<Decimal>,
}

impl ProductAggregate {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fold prices into an aggregate (used by backends without a query engine).
    pub fn from_prices<I>(prices: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let mut count = 0u64;
        let mut sum: Option<Decimal> = None;
        let mut max: Option<Decimal> = None;

        for price in prices {
            count += 1;
            sum = Some(sum.map_or(price, |s| s + price));
            max = Some(max.map_or(price, |m| m.max(price)));
        }

        let avg = sum.map(|s| s / Decimal::from(count));
        Self {
            count,
            sum,
            max,
            avg,
        }
    }

    /// Aggregate the products matching `filter`.
    pub fn over<'a, I>(products: I, filter: &ProductFilter) -> Self
    where
        I: IntoIterator<Item = &'a Product>,
    {
        Self::from_prices(
            products
                .into_iter()
                .filter(|p| filter.matches(p))
                .map(Product::price),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The sum, but only when at least one row matched.
    pub fn sum_if_any(&self) -> Option<Decimal> {
        if self.is_empty() { None } else { self.sum }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pricestats_core::ProductId;

    fn product(id: i64, name: &str, price: i64, owner: Option<i64>) -> Product {
        Product::restore(
            ProductId::from_i64(id),
            name.to_string(),
            Decimal::from(price),
            owner.map(UserId::from_i64),
            Utc::now(),
        )
    }

    fn fixture() -> Vec<Product> {
        vec![
            product(1, "product1", 1, Some(1)),
            product(2, "product2", 10, Some(2)),
            product(3, "pr", 33, Some(1)),
            product(4, "product4", 43, Some(2)),
            product(5, "product6", 90, Some(1)),
        ]
    }

    #[test]
    fn aggregate_over_owner() {
        let products = fixture();
        let agg = ProductAggregate::over(&products, &ProductFilter::owned_by(UserId::from_i64(1)));
        assert_eq!(agg.count, 3);
        assert_eq!(agg.max, Some(Decimal::from(90)));
        assert_eq!(agg.sum, Some(Decimal::from(124)));
    }

    #[test]
    fn aggregate_over_everything_averages() {
        let products = fixture();
        let agg = ProductAggregate::over(&products, &ProductFilter::all());
        assert_eq!(agg.count, 5);
        assert_eq!(agg.avg, Some(Decimal::new(354, 1)));
    }

    #[test]
    fn empty_set_has_no_values() {
        let none: Vec<Product> = Vec::new();
        let agg = ProductAggregate::over(&none, &ProductFilter::all());
        assert_eq!(agg, ProductAggregate::empty());
        assert_eq!(agg.sum_if_any(), None);
    }

    #[test]
    fn name_and_price_predicates_are_strict() {
        let products = fixture();

        let by_name = ProductFilter::owned_by(UserId::from_i64(1)).name_longer_than(2);
        // "pr" has exactly two characters and is excluded.
        assert_eq!(ProductAggregate::over(&products, &by_name).sum, Some(Decimal::from(91)));

        let by_price = ProductFilter::all().price_above(Decimal::from(43));
        assert_eq!(ProductAggregate::over(&products, &by_price).sum, Some(Decimal::from(90)));
    }

    #[test]
    fn owner_filter_skips_orphans() {
        let mut products = fixture();
        products[0] = product(1, "product1", 1, None);
        let agg = ProductAggregate::over(&products, &ProductFilter::owned_by(UserId::from_i64(1)));
        assert_eq!(agg.count, 2);
        assert_eq!(ProductAggregate::over(&products, &ProductFilter::all()).count, 5);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: count, sum and max agree with a naive recomputation.
            #[test]
            fn aggregate_matches_naive_fold(cents in proptest::collection::vec(1i64..=99_999, 0..40)) {
                let prices: Vec<Decimal> = cents.iter().map(|c| Decimal::new(*c, 2)).collect();
                let agg = ProductAggregate::from_prices(prices.iter().copied());

                prop_assert_eq!(agg.count, prices.len() as u64);
                prop_assert_eq!(agg.max, prices.iter().copied().max());
                if prices.is_empty() {
                    prop_assert_eq!(agg.sum, None);
                    prop_assert_eq!(agg.avg, None);
                } else {
                    let total: Decimal = prices.iter().copied().sum();
                    prop_assert_eq!(agg.sum, Some(total));
                }
            }
        }
    }
}
