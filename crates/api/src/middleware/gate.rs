//! Access gate for page routes.
//!
//! Every request passes through [`access_gate`]. Paths outside the gate's
//! scope (`/api`, static assets) go straight through. For the rest the gate
//! reads the `session` cookie and lands in one of three states:
//!
//! - [`SessionState::NoSession`]: protected pages redirect to sign-in, public
//!   pages pass through.
//! - [`SessionState::Valid`]: verification-gated pages consult the
//!   [`VerificationLookup`](crate::verification::VerificationLookup), then GET
//!   requests get a freshly signed cookie (sliding expiry). A session whose
//!   user no longer exists is treated as signed out.
//! - [`SessionState::ExpiredOrInvalid`]: the cookie is cleared; protected pages
//!   redirect to sign-in, public pages continue unauthenticated.

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use planform_core::route_access::{self, RouteAccess, SIGN_IN_PATH, VERIFICATION_NEEDED_PATH};
use planform_core::types::DbId;

use crate::auth::cookie::{clear_session_cookie, read_session_token, session_cookie};
use crate::auth::session_token::{SessionCodec, TokenError};
use crate::state::AppState;

/// What the request's cookie says about the caller.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Valid { user_id: DbId, token: String },
    ExpiredOrInvalid,
}

impl SessionState {
    /// Read and verify the session cookie in `headers`.
    pub fn from_headers(codec: &SessionCodec, headers: &HeaderMap) -> Self {
        let Some(token) = read_session_token(headers) else {
            return SessionState::NoSession;
        };

        match codec.verify(token) {
            Ok(payload) => SessionState::Valid {
                user_id: payload.user_id,
                token: token.to_string(),
            },
            Err(TokenError::MissingSecret) => {
                tracing::error!("SESSION_SECRET is not set; every session is rejected");
                SessionState::ExpiredOrInvalid
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session cookie rejected");
                SessionState::ExpiredOrInvalid
            }
        }
    }
}

/// Outcome of the verification check for a gated page.
enum Verification {
    Passed,
    Unverified,
    /// The session's user no longer exists.
    UnknownUser,
    /// The lookup failed or timed out and the policy is fail-closed.
    Unavailable,
}

/// Axum middleware implementing the page access rules.
///
/// Mount with `axum::middleware::from_fn_with_state`.
pub async fn access_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if !route_access::is_gated(path) {
        return next.run(request).await;
    }

    let access = route_access::classify(path);
    let session = SessionState::from_headers(&state.sessions, request.headers());

    match session {
        SessionState::NoSession => {
            if access.is_protected() {
                tracing::debug!(path, "No session, redirecting to sign-in");
                Redirect::temporary(SIGN_IN_PATH).into_response()
            } else {
                next.run(request).await
            }
        }

        SessionState::ExpiredOrInvalid => {
            let secure = state.config.session.cookie_secure;
            let mut response = if access.is_protected() {
                Redirect::temporary(SIGN_IN_PATH).into_response()
            } else {
                next.run(request).await
            };
            response
                .headers_mut()
                .append(SET_COOKIE, clear_session_cookie(secure));
            response
        }

        SessionState::Valid { user_id, token } => {
            if access == RouteAccess::VerificationRequired {
                match check_verification(&state, user_id, &token).await {
                    Verification::Passed => {}
                    Verification::Unverified => {
                        tracing::debug!(user_id, "Email not verified, redirecting");
                        return Redirect::temporary(VERIFICATION_NEEDED_PATH).into_response();
                    }
                    Verification::UnknownUser => {
                        tracing::debug!(user_id, "Session user is gone, redirecting to sign-in");
                        let mut response = Redirect::temporary(SIGN_IN_PATH).into_response();
                        response.headers_mut().append(
                            SET_COOKIE,
                            clear_session_cookie(state.config.session.cookie_secure),
                        );
                        return response;
                    }
                    Verification::Unavailable => {
                        return (
                            StatusCode::SERVICE_UNAVAILABLE,
                            "Verification status is unavailable",
                        )
                            .into_response();
                    }
                }
            }

            let refresh = request.method() == Method::GET;
            let mut response = next.run(request).await;
            if refresh {
                refresh_session(&state, user_id, &mut response);
            }
            response
        }
    }
}

async fn check_verification(state: &AppState, user_id: DbId, token: &str) -> Verification {
    let policy = &state.config.verification;
    let lookup = state.verification.is_verified(user_id, token);

    let failure = match tokio::time::timeout(policy.timeout(), lookup).await {
        Ok(Ok(true)) => return Verification::Passed,
        Ok(Ok(false)) => return Verification::Unverified,
        Ok(Err(e)) if e.is_unknown_user() => return Verification::UnknownUser,
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("lookup timed out after {}ms", policy.timeout_ms),
    };

    if policy.fail_open {
        tracing::warn!(user_id, error = %failure, "Verification lookup failed, letting request through");
        Verification::Passed
    } else {
        tracing::error!(user_id, error = %failure, "Verification lookup failed");
        Verification::Unavailable
    }
}

/// Re-sign the session for another full TTL and set it on `response`.
fn refresh_session(state: &AppState, user_id: DbId, response: &mut Response) {
    let sessions = &state.sessions;
    let cookie = sessions
        .issue(user_id, Utc::now())
        .map_err(|e| e.to_string())
        .and_then(|(token, _)| {
            session_cookie(
                &token,
                sessions.ttl().num_seconds(),
                state.config.session.cookie_secure,
            )
            .map_err(|e| e.to_string())
        });

    match cookie {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => tracing::warn!(user_id, error = %e, "Session refresh skipped"),
    }
}
