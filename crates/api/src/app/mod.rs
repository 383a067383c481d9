//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring (in-memory or Postgres)
//! - `routes/`: HTTP handlers (one file per page area)
//! - `dto.rs`: query/form bodies
//! - `errors.rs`: error pages and redirects

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    let services = Arc::new(services);

    // Protected routes: a valid session is required, otherwise 302 to login.
    let protected = routes::protected().route_layer(axum::middleware::from_fn_with_state(
        services.clone(),
        middleware::require_login,
    ));

    Router::new()
        .merge(routes::public())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
