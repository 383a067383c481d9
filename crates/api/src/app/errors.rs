use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use pricestats_auth::{AuthError, SessionError};
use pricestats_infra::StoreError;

use crate::views;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("page not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => html_error(StatusCode::NOT_FOUND, "The requested page does not exist."),
            ApiError::Store(StoreError::PriceOverflow(msg)) => {
                tracing::warn!(error = %msg, "price bump rejected");
                html_error(
                    StatusCode::CONFLICT,
                    "Prices were not changed: at least one would exceed 999.99.",
                )
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                html_error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong. Please try again later.")
            }
            ApiError::Auth(e) => {
                tracing::error!(error = %e, "authentication backend failure");
                html_error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong. Please try again later.")
            }
            ApiError::Session(e) => {
                tracing::error!(error = %e, "session could not be started");
                html_error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong. Please try again later.")
            }
        }
    }
}

pub fn html_error(status: StatusCode, message: &str) -> Response {
    (status, Html(views::error_page(status, message))).into_response()
}

/// `302 Found` to `location`, with an empty body.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// `302 Found` to `location`, also setting a cookie.
pub fn found_with_cookie(location: &str, cookie: String) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response()
}
