//! The `session` cookie.
//!
//! The cookie holds a signed session token and is always `HttpOnly`,
//! `SameSite=Lax` and scoped to `/`. `Secure` follows configuration so local
//! development over plain HTTP keeps working.

use axum::http::header::{InvalidHeaderValue, COOKIE};
use axum::http::{HeaderMap, HeaderValue};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Read the session token from the request's `Cookie` headers.
///
/// Empty values are treated as absent.
pub fn read_session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Build a `Set-Cookie` value storing `token` for `max_age_secs` seconds.
pub fn session_cookie(
    token: &str,
    max_age_secs: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax{}",
        secure_attr(secure)
    ))
}

/// Build a `Set-Cookie` value that deletes the session cookie.
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    let value = if secure {
        "session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax; Secure"
    } else {
        "session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
    };
    HeaderValue::from_static(value)
}

fn secure_attr(secure: bool) -> &'static str {
    if secure {
        "; Secure"
    } else {
        ""
    }
}
