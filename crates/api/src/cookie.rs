//! Session cookie parsing and formatting.

use axum::http::{HeaderMap, header};

use pricestats_auth::SessionId;

pub const SESSION_COOKIE_NAME: &str = "pricestats_session";

/// Session token from the request's `Cookie` headers, if well-formed.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            pair.trim()
                .strip_prefix(SESSION_COOKIE_NAME)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .find_map(SessionId::from_token)
}

/// `Set-Cookie` value issuing `session` for `max_age_secs`.
pub fn session_cookie(session: &SessionId, max_age_secs: i64, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly; {}SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE_NAME,
        session,
        if secure { "Secure; " } else { "" },
        max_age_secs.max(0)
    )
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_session_among_other_cookies() {
        let id = SessionId::generate();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}; lang=en", SESSION_COOKIE_NAME, id))
                .unwrap(),
        );

        assert_eq!(session_from_headers(&headers), Some(id));
    }

    #[test]
    fn ignores_missing_or_malformed_tokens() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("pricestats_session=garbage"),
        );
        assert_eq!(session_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("pricestats_session_old=0123456789abcdef0123456789abcdef"),
        );
        assert_eq!(session_from_headers(&headers), None);
    }

    #[test]
    fn cookie_attributes() {
        let id = SessionId::generate();

        let plain = session_cookie(&id, 60, false);
        assert!(plain.starts_with(&format!("pricestats_session={id};")));
        assert!(plain.contains("HttpOnly"));
        assert!(plain.contains("SameSite=Lax"));
        assert!(plain.contains("Max-Age=60"));
        assert!(!plain.contains("Secure"));

        assert!(session_cookie(&id, 60, true).contains("Secure; "));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
