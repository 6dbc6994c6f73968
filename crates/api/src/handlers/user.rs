//! Handlers for the `/user` resource.

use axum::extract::State;
use axum::Json;
use planform_core::error::CoreError;
use planform_db::models::user::UserInfo;
use planform_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/user
///
/// The signed-in user's public info. The access gate's HTTP verification
/// lookup reads `isVerified` from this response.
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserInfo>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(UserInfo::from(&user)))
}
