//! Postgres-backed accounts and sessions (`users` / `sessions` tables).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::instrument;

use pricestats_auth::{NewUserAccount, Session, SessionId, UserAccount, Username};
use pricestats_core::UserId;

use super::r#trait::AccountStore;
use crate::error::{StoreError, map_sqlx_error};

#[derive(Debug, Clone)]
pub struct PostgresAccountStore {
    pool: Arc<PgPool>,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn account_from_row(row: &PgRow) -> Result<UserAccount, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_user", e);

    let id: i64 = row.try_get("id").map_err(decode)?;
    let username: String = row.try_get("username").map_err(decode)?;
    let username = Username::parse(&username)
        .map_err(|e| StoreError::Corrupt(format!("user {id}: {e}")))?;

    Ok(UserAccount {
        id: UserId::from_i64(id),
        username,
        password_hash: row.try_get("password_hash").map_err(decode)?,
        is_active: row.try_get("is_active").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
    })
}

fn session_from_row(row: &PgRow) -> Result<Session, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_session", e);

    let token: String = row.try_get("id").map_err(decode)?;
    let id = SessionId::from_token(&token)
        .ok_or_else(|| StoreError::Corrupt("malformed session token".to_string()))?;
    let user_id: i64 = row.try_get("user_id").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(decode)?;

    Ok(Session {
        id,
        user_id: UserId::from_i64(user_id),
        created_at,
        expires_at,
    })
}

#[async_trait::async_trait]
impl AccountStore for PostgresAccountStore {
    #[instrument(skip(self, user), fields(username = %user.username), err)]
    async fn create_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, is_active, created_at
            "#,
        )
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_user", e))?;

        account_from_row(&row)
    }

    #[instrument(skip(self), fields(username = %username), err)]
    async fn find_by_username(&self, username: &Username) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, is_active, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_username", e))?;

        row.as_ref().map(account_from_row).transpose()
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn get_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_user", e))?;

        row.as_ref().map(account_from_row).transpose()
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn set_active(&self, id: UserId, active: bool) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE users SET is_active = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(active)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("set_active", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id), err)]
    async fn create_session(&self, session: Session) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.id.as_str())
        .bind(session.user_id.as_i64())
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_session", e))?;

        Ok(())
    }

    // Tokens are credentials; keep them out of spans.
    #[instrument(skip(self, id), err)]
    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, created_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_session", e))?;

        row.as_ref().map(session_from_row).transpose()
    }

    #[instrument(skip(self, id), err)]
    async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_session", e))?;

        Ok(())
    }
}
