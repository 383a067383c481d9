use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use pricestats_auth::{NewUserAccount, Session, SessionId, UserAccount, Username};
use pricestats_core::UserId;

use super::r#trait::AccountStore;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Accounts {
    next_id: i64,
    users: HashMap<UserId, UserAccount>,
    by_username: HashMap<Username, UserId>,
}

/// In-memory accounts and sessions. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Accounts>,
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError> {
        let mut accounts = self.accounts.write().map_err(|_| StoreError::lock_poisoned())?;

        if accounts.by_username.contains_key(&user.username) {
            return Err(StoreError::Conflict(format!(
                "username '{}' already exists",
                user.username
            )));
        }

        accounts.next_id += 1;
        let account = UserAccount {
            id: UserId::from_i64(accounts.next_id),
            username: user.username,
            password_hash: user.password_hash,
            is_active: true,
            created_at: Utc::now(),
        };
        accounts.by_username.insert(account.username.clone(), account.id);
        accounts.users.insert(account.id, account.clone());

        Ok(account)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<UserAccount>, StoreError> {
        let accounts = self.accounts.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(accounts
            .by_username
            .get(username)
            .and_then(|id| accounts.users.get(id))
            .cloned())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        let accounts = self.accounts.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(accounts.users.get(&id).cloned())
    }

    async fn set_active(&self, id: UserId, active: bool) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().map_err(|_| StoreError::lock_poisoned())?;
        match accounts.users.get_mut(&id) {
            Some(account) => {
                account.is_active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_session(&self, session: Session) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::lock_poisoned())?;
        if sessions.contains_key(&session.id) {
            return Err(StoreError::Conflict("session token already issued".to_string()));
        }
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(sessions.get(id).cloned())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::lock_poisoned())?;
        sessions.remove(id);
        Ok(())
    }
}
