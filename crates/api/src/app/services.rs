//! Store wiring shared by every handler.

use std::sync::Arc;

use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use pricestats_auth::{AuthError, NewUserAccount, UserAccount, Username, hash_password};
use pricestats_core::DomainError;
use pricestats_infra::{
    AccountStore, InMemoryAccountStore, InMemoryProductStore, PostgresAccountStore,
    PostgresProductStore, PriceAdjuster, ProductStore, Settings, StatsService, StoreError,
    ensure_schema,
};

/// Session cookie policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub ttl: Duration,
    pub cookie_secure: bool,
}

impl From<&Settings> for SessionSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            ttl: settings.session_ttl,
            cookie_secure: settings.cookie_secure,
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<dyn ProductStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub stats: StatsService<Arc<dyn ProductStore>>,
    pub adjuster: PriceAdjuster<Arc<dyn ProductStore>>,
    pub sessions: SessionSettings,
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("invalid username: {0}")]
    Username(#[from] DomainError),

    #[error(transparent)]
    Password(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppServices {
    pub fn new(
        products: Arc<dyn ProductStore>,
        accounts: Arc<dyn AccountStore>,
        settings: &Settings,
    ) -> Self {
        Self {
            stats: StatsService::new(products.clone(), settings.stats_policy),
            adjuster: PriceAdjuster::new(products.clone()),
            products,
            accounts,
            sessions: SessionSettings::from(settings),
        }
    }

    /// In-memory stores (dev/test). Data lives as long as the process.
    pub fn in_memory(settings: &Settings) -> Self {
        Self::new(
            Arc::new(InMemoryProductStore::new()),
            Arc::new(InMemoryAccountStore::new()),
            settings,
        )
    }

    /// Postgres stores; creates missing tables first.
    pub async fn persistent(settings: &Settings, database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to connect to Postgres: {e}")))?;

        ensure_schema(&pool).await?;

        Ok(Self::new(
            Arc::new(PostgresProductStore::new(pool.clone())),
            Arc::new(PostgresAccountStore::new(pool)),
            settings,
        ))
    }

    /// Hash `password` and create an active account.
    pub async fn register_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserAccount, RegisterError> {
        let username = Username::parse(username)?;
        let password_hash = hash_password(password)?;

        let account = self
            .accounts
            .create_user(NewUserAccount {
                username,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %account.id, username = %account.username, "user created");
        Ok(account)
    }
}

pub async fn build_services(settings: &Settings) -> Result<AppServices, StoreError> {
    match (settings.use_persistent_stores, settings.database_url.as_deref()) {
        (true, Some(url)) => AppServices::persistent(settings, url).await,
        (true, None) => Err(StoreError::Unavailable(
            "USE_PERSISTENT_STORES=true but DATABASE_URL is not set".to_string(),
        )),
        (false, _) => {
            tracing::warn!("using in-memory stores; data is lost on restart");
            Ok(AppServices::in_memory(settings))
        }
    }
}
