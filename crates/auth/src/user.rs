//! User accounts (identity + credentials).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pricestats_core::{DomainError, DomainResult, Entity, UserId, ValueObject};

/// Maximum username length in characters.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Login name, unique per store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if name.chars().count() > USERNAME_MAX_CHARS {
            return Err(DomainError::validation(format!(
                "username must contain at most {USERNAME_MAX_CHARS} characters"
            )));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("username cannot contain whitespace"));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Username {}

impl core::fmt::Display for Username {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored user account.
///
/// # Invariants
/// - `password_hash` is a PHC string produced by [`crate::hash_password`].
/// - Inactive accounts cannot log in and their sessions are not honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub username: Username,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for UserAccount {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Account to insert; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    pub username: Username,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_trimmed() {
        assert_eq!(Username::parse("  user1 ").unwrap().as_str(), "user1");
    }

    #[test]
    fn account_identity_is_its_id() {
        let account = UserAccount {
            id: UserId::from_i64(5),
            username: Username::parse("user1").unwrap(),
            password_hash: String::new(),
            is_active: true,
            created_at: Utc::now(),
        };
        assert_eq!(*Entity::id(&account), UserId::from_i64(5));
    }

    #[test]
    fn username_rules() {
        assert!(Username::parse("").is_err());
        assert!(Username::parse("two words").is_err());
        assert!(Username::parse(&"u".repeat(151)).is_err());
        assert!(Username::parse(&"u".repeat(150)).is_ok());
    }
}
