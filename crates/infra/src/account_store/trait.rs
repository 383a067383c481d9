use std::sync::Arc;

use pricestats_auth::{NewUserAccount, Session, SessionId, UserAccount, Username};
use pricestats_core::UserId;

use crate::error::StoreError;

/// User accounts and their login sessions.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Create an account. A taken username is [`StoreError::Conflict`].
    async fn create_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError>;

    async fn find_by_username(&self, username: &Username) -> Result<Option<UserAccount>, StoreError>;

    async fn get_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError>;

    /// Enable or disable login for an account. Returns `false` if it does not exist.
    async fn set_active(&self, id: UserId, active: bool) -> Result<bool, StoreError>;

    async fn create_session(&self, session: Session) -> Result<(), StoreError>;

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Remove a session; removing an unknown one is not an error.
    async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    async fn create_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError> {
        (**self).create_user(user).await
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<UserAccount>, StoreError> {
        (**self).find_by_username(username).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        (**self).get_user(id).await
    }

    async fn set_active(&self, id: UserId, active: bool) -> Result<bool, StoreError> {
        (**self).set_active(id, active).await
    }

    async fn create_session(&self, session: Session) -> Result<(), StoreError> {
        (**self).create_session(session).await
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        (**self).get_session(id).await
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError> {
        (**self).delete_session(id).await
    }
}
