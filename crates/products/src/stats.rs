//! Statistics records shown on the stats page, and the conditional-sum policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pricestats_core::UserId;

use crate::query::{ProductAggregate, ProductFilter};

/// Amount the price adjuster adds to each of a user's prices.
pub const PRICE_BUMP: Decimal = Decimal::ONE;

/// Aggregates over the products one user owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub max_price: Option<Decimal>,
    pub sum_price: Option<Decimal>,
    pub count: u64,
}

impl From<ProductAggregate> for UserSummary {
    fn from(agg: ProductAggregate) -> Self {
        Self {
            max_price: agg.max,
            sum_price: agg.sum,
            count: agg.count,
        }
    }
}

/// Aggregates over every stored product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub count: u64,
    pub avg_price: Option<Decimal>,
}

impl From<ProductAggregate> for GlobalSummary {
    fn from(agg: ProductAggregate) -> Self {
        Self {
            count: agg.count,
            avg_price: agg.avg,
        }
    }
}

/// Thresholds of the two-branch conditional sum.
///
/// 1. the caller's products whose name is longer than `name_length`;
/// 2. otherwise every product (any owner) priced above `price`;
/// 3. otherwise zero.
///
/// The first branch with at least one matching row decides the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalSumPolicy {
    pub name_length: usize,
    pub price: Decimal,
}

impl Default for ConditionalSumPolicy {
    fn default() -> Self {
        Self {
            name_length: 3,
            price: Decimal::from(50),
        }
    }
}

impl ConditionalSumPolicy {
    pub fn new(name_length: usize, price: Decimal) -> Self {
        Self { name_length, price }
    }

    /// Branch 1 filter: scoped to the caller.
    pub fn caller_filter(&self, caller: UserId) -> ProductFilter {
        ProductFilter::owned_by(caller).name_longer_than(self.name_length)
    }

    /// Branch 2 filter: global, any owner.
    pub fn global_filter(&self) -> ProductFilter {
        ProductFilter::all().price_above(self.price)
    }

    /// Decide from the branch-1 aggregate alone, if it has any row.
    pub fn from_caller_branch(agg: &ProductAggregate) -> Option<ConditionalSum> {
        agg.sum_if_any().map(|total| ConditionalSum {
            branch: ConditionalSumBranch::CallerNameLength,
            total,
        })
    }

    /// Decide from the branch-2 aggregate, falling back to zero.
    pub fn from_global_branch(agg: &ProductAggregate) -> ConditionalSum {
        match agg.sum_if_any() {
            Some(total) => ConditionalSum {
                branch: ConditionalSumBranch::GlobalPrice,
                total,
            },
            None => ConditionalSum::zero(),
        }
    }
}

/// Which branch of the policy produced a conditional sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionalSumBranch {
    CallerNameLength,
    GlobalPrice,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalSum {
    pub branch: ConditionalSumBranch,
    pub total: Decimal,
}

impl ConditionalSum {
    pub fn zero() -> Self {
        Self {
            branch: ConditionalSumBranch::Fallback,
            total: Decimal::ZERO,
        }
    }
}

/// Everything the stats page shows for one caller.
///
/// `user` is present only when the caller owns at least one product, `global`
/// only when any product exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub user: Option<UserSummary>,
    pub global: Option<GlobalSummary>,
    pub conditional_sum: ConditionalSum,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(count: u64, sum: i64) -> ProductAggregate {
        ProductAggregate {
            count,
            sum: (count > 0).then(|| Decimal::from(sum)),
            max: None,
            avg: None,
        }
    }

    #[test]
    fn default_thresholds() {
        let policy = ConditionalSumPolicy::default();
        assert_eq!(policy.name_length, 3);
        assert_eq!(policy.price, Decimal::from(50));
    }

    #[test]
    fn caller_filter_is_owner_scoped_and_global_filter_is_not() {
        let policy = ConditionalSumPolicy::default();
        let caller = UserId::from_i64(7);

        let first = policy.caller_filter(caller);
        assert_eq!(first.owner, Some(caller));
        assert_eq!(first.name_len_gt, Some(3));
        assert_eq!(first.price_gt, None);

        let second = policy.global_filter();
        assert_eq!(second.owner, None);
        assert_eq!(second.name_len_gt, None);
        assert_eq!(second.price_gt, Some(Decimal::from(50)));
    }

    #[test]
    fn caller_branch_only_decides_when_rows_match() {
        assert_eq!(ConditionalSumPolicy::from_caller_branch(&agg(0, 0)), None);

        let sum = ConditionalSumPolicy::from_caller_branch(&agg(2, 91)).unwrap();
        assert_eq!(sum.branch, ConditionalSumBranch::CallerNameLength);
        assert_eq!(sum.total, Decimal::from(91));
    }

    #[test]
    fn global_branch_falls_back_to_zero() {
        let sum = ConditionalSumPolicy::from_global_branch(&agg(0, 0));
        assert_eq!(sum, ConditionalSum::zero());

        let sum = ConditionalSumPolicy::from_global_branch(&agg(1, 90));
        assert_eq!(sum.branch, ConditionalSumBranch::GlobalPrice);
        assert_eq!(sum.total, Decimal::from(90));
    }

    #[test]
    fn summaries_keep_absent_values_absent() {
        let user = UserSummary::from(ProductAggregate::empty());
        assert_eq!(user.count, 0);
        assert_eq!(user.max_price, None);
        assert_eq!(user.sum_price, None);

        let global = GlobalSummary::from(ProductAggregate::empty());
        assert_eq!(global.avg_price, None);
    }
}
