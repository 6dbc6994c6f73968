//! Session-cookie authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use planform_core::error::CoreError;
use planform_core::types::DbId;

use crate::auth::cookie::read_session_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the `session` cookie.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's internal database id (from the token's `sub` claim).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_session_token(&parts.headers).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Not signed in".into()))
        })?;

        let payload = state.sessions.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        Ok(AuthUser {
            user_id: payload.user_id,
        })
    }
}
