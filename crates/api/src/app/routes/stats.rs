//! Stats page and price bump.
//!
//! Both act on the logged-in user. The `<user_id>` segment must be an integer
//! but its value is not consulted.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::{Html, Response},
};

use crate::app::errors::{ApiError, found};
use crate::app::routes::parse_user_segment;
use crate::app::services::AppServices;
use crate::context::CurrentUser;
use crate::views;

pub async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let requested = parse_user_segment(&user_id).ok_or(ApiError::NotFound)?;
    if requested != user.user_id() {
        tracing::debug!(requested = %requested, caller = %user.user_id(), "showing caller's stats");
    }

    let report = services.stats.report(user.user_id()).await?;
    Ok(Html(views::stats_page(&user, &report)))
}

pub async fn increase(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    parse_user_segment(&user_id).ok_or(ApiError::NotFound)?;

    services.adjuster.bump(user.user_id()).await?;
    Ok(found(&format!("/stats/{}/", user.user_id())))
}
