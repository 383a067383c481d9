//! Aggregator and price adjuster over a [`ProductStore`].

use tracing::{debug, info, instrument};

use pricestats_core::UserId;
use pricestats_products::{
    ConditionalSum, ConditionalSumPolicy, GlobalSummary, ProductFilter, StatsReport, UserSummary,
    PRICE_BUMP,
};

use crate::error::StoreError;
use crate::product_store::ProductStore;

/// Read-only statistics, scoped per caller.
///
/// Holds no per-request state: every call takes the caller explicitly and
/// returns a fresh record.
#[derive(Debug, Clone)]
pub struct StatsService<S> {
    store: S,
    policy: ConditionalSumPolicy,
}

impl<S: ProductStore> StatsService<S> {
    pub fn new(store: S, policy: ConditionalSumPolicy) -> Self {
        Self { store, policy }
    }

    /// Max / sum / count over the products `user` owns.
    pub async fn user_summary(&self, user: UserId) -> Result<UserSummary, StoreError> {
        let agg = self.store.aggregate(ProductFilter::owned_by(user)).await?;
        Ok(UserSummary::from(agg))
    }

    /// Count / average over every product.
    pub async fn global_summary(&self) -> Result<GlobalSummary, StoreError> {
        let agg = self.store.aggregate(ProductFilter::all()).await?;
        Ok(GlobalSummary::from(agg))
    }

    /// Two-branch conditional sum; the second query only runs if the first
    /// branch matched nothing.
    pub async fn conditional_sum(&self, caller: UserId) -> Result<ConditionalSum, StoreError> {
        let first = self.store.aggregate(self.policy.caller_filter(caller)).await?;
        if let Some(sum) = ConditionalSumPolicy::from_caller_branch(&first) {
            return Ok(sum);
        }

        let second = self.store.aggregate(self.policy.global_filter()).await?;
        Ok(ConditionalSumPolicy::from_global_branch(&second))
    }

    /// Everything the stats page shows for `caller`.
    #[instrument(skip(self), fields(caller = %caller), err)]
    pub async fn report(&self, caller: UserId) -> Result<StatsReport, StoreError> {
        let user = self.user_summary(caller).await?;
        let global = self.global_summary().await?;
        let conditional_sum = self.conditional_sum(caller).await?;

        debug!(
            user_count = user.count,
            global_count = global.count,
            branch = ?conditional_sum.branch,
            "stats computed"
        );

        Ok(StatsReport {
            user: (user.count > 0).then_some(user),
            global: (global.count > 0).then_some(global),
            conditional_sum,
        })
    }
}

/// Raises every price a user owns by [`PRICE_BUMP`].
#[derive(Debug, Clone)]
pub struct PriceAdjuster<S> {
    store: S,
}

impl<S: ProductStore> PriceAdjuster<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the number of products changed (0 is a successful no-op).
    #[instrument(skip(self), fields(owner = %owner), err)]
    pub async fn bump(&self, owner: UserId) -> Result<u64, StoreError> {
        let changed = self.store.increment_prices(owner, PRICE_BUMP).await?;
        info!(owner = %owner, changed, "prices bumped");
        Ok(changed)
    }
}
