use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use pricestats_auth::{SessionError, validate_session};

use crate::app::errors::{ApiError, found};
use crate::app::services::AppServices;
use crate::context::CurrentUser;
use crate::cookie::session_from_headers;

/// Resolve the session cookie into a [`CurrentUser`], or send the caller to
/// the login page with the requested path as `next`.
pub async fn require_login(
    State(services): State<Arc<AppServices>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // The request body is not `Sync`; keep it out of the awaited lookup.
    let headers = req.headers().clone();
    match resolve_user(&services, &headers).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(None) => found(&login_redirect(req.uri())),
        Err(e) => e.into_response(),
    }
}

async fn resolve_user(
    services: &AppServices,
    headers: &HeaderMap,
) -> Result<Option<CurrentUser>, ApiError> {
    let Some(session_id) = session_from_headers(headers) else {
        return Ok(None);
    };

    let Some(session) = services.accounts.get_session(&session_id).await? else {
        return Ok(None);
    };

    if let Err(e) = validate_session(&session, Utc::now()) {
        tracing::debug!(user_id = %session.user_id, error = %e, "session rejected");
        if e == SessionError::Expired {
            services.accounts.delete_session(&session_id).await?;
        }
        return Ok(None);
    }

    match services.accounts.get_user(session.user_id).await? {
        Some(account) if account.is_active => {
            Ok(Some(CurrentUser::new(account.id, account.username)))
        }
        _ => Ok(None),
    }
}

/// `/?next=<path>` with the path percent-encoded except for `/`.
pub fn login_redirect(uri: &Uri) -> String {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    format!("/?next={}", urlencoded(target).replace("%2F", "/"))
}

fn urlencoded(s: &str) -> String {
    serde_urlencoded::to_string([("", s)])
        .unwrap_or_default()
        .trim_start_matches('=')
        .to_string()
}
