use std::sync::Arc;

use axum::{
    Form,
    extract::{Extension, Query},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;

use pricestats_auth::{AuthError, Session, Username, authenticate, safe_redirect_target};

use crate::app::dto::{LoginForm, NextQuery};
use crate::app::errors::{ApiError, found_with_cookie};
use crate::app::services::AppServices;
use crate::cookie::{clear_session_cookie, session_cookie, session_from_headers};
use crate::views;

/// Where a successful login lands when no usable `next` was given.
pub const LOGIN_HOME: &str = "/create/";

const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
const INACTIVE_LOGIN: &str = "This account is inactive.";
const MISSING_FIELDS: &str = "Please enter both a username and a password.";

pub async fn login_form(Query(query): Query<NextQuery>) -> Html<String> {
    Html(views::login_page("", query.next.as_deref(), None))
}

pub async fn login_submit(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let next = form.next.as_deref();
    let redisplay = |message: &str| {
        Html(views::login_page(form.username.trim(), next, Some(message))).into_response()
    };

    if form.username.trim().is_empty() || form.password.is_empty() {
        return Ok(redisplay(MISSING_FIELDS));
    }

    // A name that could never have been registered is just an unknown user.
    let account = match Username::parse(&form.username) {
        Ok(username) => services.accounts.find_by_username(&username).await?,
        Err(_) => None,
    };

    let user_id = match authenticate(account.as_ref(), &form.password) {
        Ok(user_id) => user_id,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!(username = %form.username.trim(), "login failed");
            return Ok(redisplay(INVALID_LOGIN));
        }
        Err(AuthError::Inactive) => {
            tracing::info!(username = %form.username.trim(), "login refused for inactive account");
            return Ok(redisplay(INACTIVE_LOGIN));
        }
        Err(e) => return Err(e.into()),
    };

    let ttl = services.sessions.ttl;
    let session = Session::start(user_id, Utc::now(), ttl)?;
    let cookie = session_cookie(&session.id, ttl.num_seconds(), services.sessions.cookie_secure);
    services.accounts.create_session(session).await?;

    let target = safe_redirect_target(next).unwrap_or(LOGIN_HOME);
    tracing::info!(user_id = %user_id, "login succeeded");

    Ok(found_with_cookie(target, cookie))
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(session_id) = session_from_headers(&headers) {
        services.accounts.delete_session(&session_id).await?;
    }

    Ok(found_with_cookie("/", clear_session_cookie()))
}
