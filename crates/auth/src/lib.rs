//! `pricestats-auth`: accounts, password verification and sessions.
//!
//! This crate is intentionally decoupled from HTTP and storage: stores hand it
//! records, it decides whether a login or a session is acceptable.

pub mod login;
pub mod password;
pub mod session;
pub mod user;

pub use login::{authenticate, safe_redirect_target, AuthError};
pub use password::{hash_password, verify_password};
pub use session::{validate_session, Session, SessionError, SessionId};
pub use user::{NewUserAccount, UserAccount, Username};
