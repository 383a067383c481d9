//! Store-backed tests for the aggregator and the price adjuster.
//!
//! Fixture: user A owns `product1:1, pr:33, product6:90`, user B owns
//! `product2:10, product4:43`.

use std::sync::Arc;

use rust_decimal::Decimal;

use pricestats_core::UserId;
use pricestats_products::{
    ConditionalSum, ConditionalSumBranch, ConditionalSumPolicy, ProductFilter, validate_entry,
    NewProduct,
};

use crate::error::StoreError;
use crate::product_store::{InMemoryProductStore, ProductStore};
use crate::stats::{PriceAdjuster, StatsService};

const A: UserId = UserId::from_i64(1);
const B: UserId = UserId::from_i64(2);
const NOBODY: UserId = UserId::from_i64(3);

async fn add<S: ProductStore>(store: &S, name: &str, price: i64, owner: UserId) {
    let entry = validate_entry(name, Decimal::from(price)).unwrap();
    store
        .insert(NewProduct {
            name: entry.name,
            price: entry.price,
            owner: Some(owner),
        })
        .await
        .unwrap();
}

async fn fixture() -> Arc<InMemoryProductStore> {
    let store = Arc::new(InMemoryProductStore::new());
    add(&store, "product1", 1, A).await;
    add(&store, "product2", 10, B).await;
    add(&store, "pr", 33, A).await;
    add(&store, "product4", 43, B).await;
    add(&store, "product6", 90, A).await;
    store
}

fn stats(store: Arc<InMemoryProductStore>) -> StatsService<Arc<InMemoryProductStore>> {
    StatsService::new(store, ConditionalSumPolicy::default())
}

#[tokio::test]
async fn user_summary_over_owned_products() {
    let summary = stats(fixture().await).user_summary(A).await.unwrap();

    assert_eq!(summary.max_price, Some(Decimal::from(90)));
    assert_eq!(summary.sum_price, Some(Decimal::from(124)));
    assert_eq!(summary.count, 3);
}

#[tokio::test]
async fn user_summary_for_user_without_products_is_empty() {
    let summary = stats(fixture().await).user_summary(NOBODY).await.unwrap();

    assert_eq!(summary.count, 0);
    assert_eq!(summary.max_price, None);
    assert_eq!(summary.sum_price, None);
}

#[tokio::test]
async fn global_summary_counts_and_averages_everything() {
    let summary = stats(fixture().await).global_summary().await.unwrap();

    assert_eq!(summary.count, 5);
    assert_eq!(summary.avg_price, Some(Decimal::new(354, 1)));
}

#[tokio::test]
async fn global_summary_of_empty_store() {
    let store = Arc::new(InMemoryProductStore::new());
    let summary = stats(store).global_summary().await.unwrap();

    assert_eq!(summary.count, 0);
    assert_eq!(summary.avg_price, None);
}

#[tokio::test]
async fn conditional_sum_takes_caller_name_branch_first() {
    let sum = stats(fixture().await).conditional_sum(A).await.unwrap();

    assert_eq!(sum.branch, ConditionalSumBranch::CallerNameLength);
    assert_eq!(sum.total, Decimal::from(91));
}

#[tokio::test]
async fn conditional_sum_falls_through_to_global_price_branch() {
    let store = fixture().await;
    // C owns only a short-named product, so the price branch decides over every owner.
    let c = UserId::from_i64(4);
    add(&store, "abc", 5, c).await;

    let sum = stats(store).conditional_sum(c).await.unwrap();
    assert_eq!(sum.branch, ConditionalSumBranch::GlobalPrice);
    assert_eq!(sum.total, Decimal::from(90));
}

#[tokio::test]
async fn conditional_sum_is_zero_when_no_branch_matches() {
    let store = Arc::new(InMemoryProductStore::new());
    add(&store, "pr", 10, A).await;
    add(&store, "abc", 50, B).await;

    let sum = stats(store).conditional_sum(A).await.unwrap();
    assert_eq!(sum, ConditionalSum::zero());
}

#[tokio::test]
async fn conditional_sum_uses_configured_thresholds() {
    let service = StatsService::new(fixture().await, ConditionalSumPolicy::new(100, Decimal::from(40)));

    let sum = service.conditional_sum(A).await.unwrap();
    assert_eq!(sum.branch, ConditionalSumBranch::GlobalPrice);
    assert_eq!(sum.total, Decimal::from(133));
}

#[tokio::test]
async fn report_hides_absent_sections() {
    let report = stats(fixture().await).report(NOBODY).await.unwrap();
    assert!(report.user.is_none());
    assert_eq!(report.global.map(|g| g.count), Some(5));
    assert_eq!(report.conditional_sum.branch, ConditionalSumBranch::GlobalPrice);

    let empty = stats(Arc::new(InMemoryProductStore::new()))
        .report(A)
        .await
        .unwrap();
    assert!(empty.user.is_none());
    assert!(empty.global.is_none());
    assert_eq!(empty.conditional_sum, ConditionalSum::zero());
}

#[tokio::test]
async fn bump_adds_one_to_each_owned_price() {
    let store = Arc::new(InMemoryProductStore::new());
    add(&store, "one", 1, A).await;
    add(&store, "two", 2, A).await;
    add(&store, "three", 3, A).await;

    let owned = ProductFilter::owned_by(A);
    assert_eq!(store.aggregate(owned).await.unwrap().sum, Some(Decimal::from(6)));

    let adjuster = PriceAdjuster::new(store.clone());
    assert_eq!(adjuster.bump(A).await.unwrap(), 3);
    assert_eq!(store.aggregate(owned).await.unwrap().sum, Some(Decimal::from(9)));

    assert_eq!(adjuster.bump(A).await.unwrap(), 3);
    assert_eq!(store.aggregate(owned).await.unwrap().sum, Some(Decimal::from(12)));
}

#[tokio::test]
async fn bump_leaves_other_owners_alone() {
    let store = fixture().await;
    let before = store.aggregate(ProductFilter::owned_by(B)).await.unwrap();

    PriceAdjuster::new(store.clone()).bump(A).await.unwrap();

    assert_eq!(store.aggregate(ProductFilter::owned_by(B)).await.unwrap(), before);
}

#[tokio::test]
async fn bump_without_products_is_a_no_op() {
    let store = fixture().await;
    let before = store.aggregate(ProductFilter::all()).await.unwrap();

    let changed = PriceAdjuster::new(store.clone()).bump(NOBODY).await.unwrap();
    assert_eq!(changed, 0);
    assert_eq!(store.aggregate(ProductFilter::all()).await.unwrap(), before);
}

#[tokio::test]
async fn bump_overflow_changes_nothing() {
    let store = Arc::new(InMemoryProductStore::new());
    add(&store, "cheap", 5, A).await;
    let entry = validate_entry("dear", Decimal::new(99_950, 2)).unwrap();
    store
        .insert(NewProduct {
            name: entry.name,
            price: entry.price,
            owner: Some(A),
        })
        .await
        .unwrap();

    let before = store.aggregate(ProductFilter::owned_by(A)).await.unwrap();
    let err = PriceAdjuster::new(store.clone()).bump(A).await.unwrap_err();

    assert!(matches!(err, StoreError::PriceOverflow(_)));
    assert_eq!(store.aggregate(ProductFilter::owned_by(A)).await.unwrap(), before);
}

mod postgres {
    //! Runs only when `DATABASE_URL` points at a disposable database.

    use super::*;
    use chrono::Utc;
    use sqlx::postgres::PgPoolOptions;

    use pricestats_auth::{NewUserAccount, Session, Username, hash_password};

    use crate::account_store::{AccountStore, PostgresAccountStore};
    use crate::product_store::PostgresProductStore;
    use crate::schema::ensure_schema;

    async fn pool() -> Option<sqlx::PgPool> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .unwrap();
        ensure_schema(&pool).await.unwrap();
        Some(pool)
    }

    async fn fresh_user(accounts: &PostgresAccountStore) -> UserId {
        let name = format!("pg_user_{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());
        accounts
            .create_user(NewUserAccount {
                username: Username::parse(&name).unwrap(),
                password_hash: hash_password("12345").unwrap(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn postgres_owner_aggregate_and_bump() {
        let Some(pool) = pool().await else { return };
        let accounts = PostgresAccountStore::new(pool.clone());
        let products = PostgresProductStore::new(pool);
        let owner = fresh_user(&accounts).await;

        add(&products, "product1", 1, owner).await;
        add(&products, "pr", 33, owner).await;
        add(&products, "product6", 90, owner).await;

        let service = StatsService::new(products.clone(), ConditionalSumPolicy::default());
        let summary = service.user_summary(owner).await.unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.max_price, Some(Decimal::from(90)));
        assert_eq!(summary.sum_price, Some(Decimal::from(124)));

        let sum = service.conditional_sum(owner).await.unwrap();
        assert_eq!(sum.branch, ConditionalSumBranch::CallerNameLength);
        assert_eq!(sum.total, Decimal::from(91));

        assert_eq!(PriceAdjuster::new(products.clone()).bump(owner).await.unwrap(), 3);
        let summary = service.user_summary(owner).await.unwrap();
        assert_eq!(summary.sum_price, Some(Decimal::from(127)));
    }

    #[tokio::test]
    async fn postgres_bump_overflow_is_reported() {
        let Some(pool) = pool().await else { return };
        let accounts = PostgresAccountStore::new(pool.clone());
        let products = PostgresProductStore::new(pool);
        let owner = fresh_user(&accounts).await;

        let entry = validate_entry("dear", Decimal::new(99_950, 2)).unwrap();
        products
            .insert(NewProduct {
                name: entry.name,
                price: entry.price,
                owner: Some(owner),
            })
            .await
            .unwrap();

        let err = products.increment_prices(owner, Decimal::ONE).await.unwrap_err();
        assert!(matches!(err, StoreError::PriceOverflow(_)));
    }

    #[tokio::test]
    async fn postgres_sessions_round_trip() {
        let Some(pool) = pool().await else { return };
        let accounts = PostgresAccountStore::new(pool);
        let user = fresh_user(&accounts).await;

        let session = Session::start(user, Utc::now(), chrono::Duration::hours(1)).unwrap();
        accounts.create_session(session.clone()).await.unwrap();

        let loaded = accounts.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.user_id, user);

        accounts.delete_session(&session.id).await.unwrap();
        assert!(accounts.get_session(&session.id).await.unwrap().is_none());
    }
}
