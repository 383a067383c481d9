use thiserror::Error;

use pricestats_core::UserId;

use crate::password::verify_password;
use crate::user::UserAccount;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password (deliberately indistinguishable).
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("account is inactive")]
    Inactive,

    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Decide a login attempt against the account looked up by username.
///
/// - No IO
/// - `account` is `None` when the username is unknown
pub fn authenticate(account: Option<&UserAccount>, password: &str) -> Result<UserId, AuthError> {
    let account = account.ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &account.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }
    if !account.is_active {
        return Err(AuthError::Inactive);
    }

    Ok(account.id)
}

/// Accept a post-login redirect target only if it stays on this site.
///
/// Local absolute paths (`/stats/1/`) pass; scheme-relative (`//evil`),
/// backslash tricks and absolute URLs are dropped.
pub fn safe_redirect_target(next: Option<&str>) -> Option<&str> {
    let next = next?.trim();
    let local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.starts_with("/\\")
        && !next.chars().any(|c| c.is_control());
    local.then_some(next)
}
