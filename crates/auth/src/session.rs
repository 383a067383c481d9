//! Server-side login sessions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use pricestats_core::UserId;

/// Opaque session token carried by the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Fresh random token (UUIDv4, 122 random bits, hex without dashes).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap a token received from a client. Anything that is not 32 hex
    /// characters cannot have been issued by [`SessionId::generate`].
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        let well_formed = token.len() == 32 && token.bytes().all(|b| b.is_ascii_hexdigit());
        well_formed.then(|| Self(token.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Start a new session for `user_id` lasting `ttl` from `now`.
    ///
    /// Fails when `now + ttl` is not a representable timestamp.
    pub fn start(user_id: UserId, now: DateTime<Utc>, ttl: Duration) -> Result<Self, SessionError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(SessionError::TtlOutOfRange)?;

        Ok(Self {
            id: SessionId::generate(),
            user_id,
            created_at: now,
            expires_at,
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (created_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= created_at)")]
    InvalidTimeWindow,

    #[error("session lifetime runs past the supported time range")]
    TtlOutOfRange,
}

/// Deterministically validate a session's time window.
pub fn validate_session(session: &Session, now: DateTime<Utc>) -> Result<(), SessionError> {
    if session.expires_at <= session.created_at {
        return Err(SessionError::InvalidTimeWindow);
    }
    if now < session.created_at {
        return Err(SessionError::NotYetValid);
    }
    if now >= session.expires_at {
        return Err(SessionError::Expired);
    }
    Ok(())
}
