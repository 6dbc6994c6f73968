//! Handlers for the `/auth` resource (sign-up, sign-in, sign-out, email
//! verification).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::Json;
use chrono::Utc;
use planform_core::error::CoreError;
use planform_core::hashing::sha256_hex;
use planform_core::types::DbId;
use planform_db::models::user::{CreateUser, UserInfo};
use planform_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A response that sets exactly one header.
type WithCookie<T> = ([(HeaderName, HeaderValue); 1], T);

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/sign-up`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request body for `POST /auth/sign-in`.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/verify-email`.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/sign-up
///
/// Create an account, email a verification link and sign the new user in.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<(StatusCode, WithCookie<Json<UserInfo>>)> {
    let input = SignUpRequest {
        email: input.email.trim().to_lowercase(),
        name: input.name.trim().to_string(),
        password: input.password,
    };
    input.validate()?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let verification_token = uuid::Uuid::new_v4().simple().to_string();

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            name: input.name,
            password_hash,
            verification_token_hash: Some(sha256_hex(verification_token.as_bytes())),
            remaining_runs: state.config.default_remaining_runs,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "User signed up");

    let link = format!(
        "{}/verify-email?token={verification_token}",
        state.config.app_base_url
    );
    // The account is committed; delivery must not hold the response.
    let mailer = state.mailer.clone();
    let (user_id, email, name) = (user.id, user.email.clone(), user.name.clone());
    tokio::spawn(async move {
        if let Err(e) = mailer.send_verification(&email, &name, &link).await {
            tracing::warn!(user_id, error = %e, "Failed to send verification email");
        }
    });

    let cookie = new_session_cookie(&state, user.id)?;
    Ok((
        StatusCode::CREATED,
        ([(SET_COOKIE, cookie)], Json(UserInfo::from(&user))),
    ))
}

/// POST /api/auth/sign-in
///
/// Authenticate with email + password and set the session cookie.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(input): Json<SignInRequest>,
) -> AppResult<WithCookie<Json<UserInfo>>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    let cookie = new_session_cookie(&state, user.id)?;
    tracing::info!(user_id = user.id, "User signed in");
    Ok(([(SET_COOKIE, cookie)], Json(UserInfo::from(&user))))
}

/// POST /api/auth/sign-out
///
/// Clear the session cookie. Sessions are stateless, so there is nothing to
/// revoke server-side.
pub async fn sign_out(State(state): State<AppState>) -> (StatusCode, WithCookie<()>) {
    let cookie = clear_session_cookie(state.config.session.cookie_secure);
    (StatusCode::NO_CONTENT, ([(SET_COOKIE, cookie)], ()))
}

/// POST /api/auth/verify-email
///
/// Consume a verification token and mark its user verified.
pub async fn verify_email(
    State(state): State<AppState>,
    Json(input): Json<VerifyEmailRequest>,
) -> AppResult<Json<UserInfo>> {
    let token = input.token.trim();
    if token.is_empty() {
        return Err(AppError::BadRequest("Verification token is required".into()));
    }

    let user = UserRepo::verify_email(&state.pool, &sha256_hex(token.as_bytes()))
        .await?
        .ok_or_else(|| AppError::NotFound("Verification token not recognised".into()))?;

    tracing::info!(user_id = user.id, "Email verified");
    Ok(Json(UserInfo::from(&user)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign a fresh session for `user_id` and render it as a `Set-Cookie` value.
fn new_session_cookie(state: &AppState, user_id: DbId) -> AppResult<HeaderValue> {
    let (token, _) = state
        .sessions
        .issue(user_id, Utc::now())
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    session_cookie(
        &token,
        state.sessions.ttl().num_seconds(),
        state.config.session.cookie_secure,
    )
    .map_err(|e| AppError::InternalError(format!("Session cookie error: {e}")))
}
