use pricestats_auth::Username;
use pricestats_core::UserId;

/// Authenticated caller of a request.
///
/// Inserted by the login middleware; present on every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    user_id: UserId,
    username: Username,
}

impl CurrentUser {
    pub fn new(user_id: UserId, username: Username) -> Self {
        Self { user_id, username }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}
