use axum::{
    Router,
    routing::get,
};

use pricestats_core::UserId;

pub mod login;
pub mod products;
pub mod stats;
pub mod system;

/// Router for every endpoint that needs a logged-in user.
pub fn protected() -> Router {
    Router::new()
        .route("/create/", get(products::create_form).post(products::create_product))
        .route("/stats/:user_id/", get(stats::stats))
        .route("/increase/:user_id/", get(stats::increase))
}

/// Router for endpoints reachable without a session.
pub fn public() -> Router {
    Router::new()
        .route("/", get(login::login_form).post(login::login_submit))
        .route("/logout/", axum::routing::post(login::logout))
        .route("/health", get(system::health))
}

/// Parse a `<user_id>` path segment: unsigned decimal digits only.
pub(crate) fn parse_user_segment(raw: &str) -> Option<UserId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<UserId>().ok()
}
