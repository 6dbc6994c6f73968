//! Handlers for the `/ideas` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use planform_core::error::CoreError;
use planform_core::idea::{ensure_runs_available, normalize_optional, quota_exhausted};
use planform_core::types::DbId;
use planform_db::models::idea::{CreateIdea, Idea, IdeaSubmission};
use planform_db::repositories::{IdeaRepo, UserRepo};
use planform_db::DbPool;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /ideas`.
///
/// Missing fields deserialize as empty strings so they are reported by field
/// validation rather than as a malformed body.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitIdeaRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,
    #[validate(length(min = 10, max = 5000, message = "Describe your idea in 10-5000 characters"))]
    pub raw_idea: String,
    #[validate(length(min = 1, max = 1000, message = "Ideal customer must be 1-1000 characters"))]
    pub ideal_customer: String,
    #[validate(length(min = 1, max = 2000, message = "Problem must be 1-2000 characters"))]
    pub problem: String,
    #[validate(length(max = 2000, message = "Current solutions must be at most 2000 characters"))]
    pub current_solutions: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "Value proposition must be 1-1000 characters"))]
    pub value_prop: String,
}

impl SubmitIdeaRequest {
    /// Trim every field; a blank `currentSolutions` becomes absent.
    fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            raw_idea: self.raw_idea.trim().to_string(),
            ideal_customer: self.ideal_customer.trim().to_string(),
            problem: self.problem.trim().to_string(),
            current_solutions: normalize_optional(self.current_solutions),
            value_prop: self.value_prop.trim().to_string(),
        }
    }
}

impl From<SubmitIdeaRequest> for CreateIdea {
    fn from(req: SubmitIdeaRequest) -> Self {
        Self {
            title: req.title,
            raw_idea: req.raw_idea,
            ideal_customer: req.ideal_customer,
            problem: req.problem,
            current_solutions: req.current_solutions,
            value_prop: req.value_prop,
        }
    }
}

/// Response body for `POST /ideas`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitIdeaResponse {
    pub idea_id: DbId,
    pub remaining_runs: i32,
}

/// POST /api/ideas
///
/// Consumes one run credit. Returns 403 `QUOTA_EXHAUSTED` when none are left.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitIdeaRequest>,
) -> AppResult<(StatusCode, Json<SubmitIdeaResponse>)> {
    let input = input.normalized();
    input.validate()?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    ensure_runs_available(user.remaining_runs)?;

    match IdeaRepo::create_with_run_debit(&state.pool, user.id, &input.into()).await? {
        IdeaSubmission::Created {
            idea,
            remaining_runs,
        } => {
            tracing::info!(idea_id = idea.id, user_id = user.id, remaining_runs, "Idea submitted");
            Ok((
                StatusCode::CREATED,
                Json(SubmitIdeaResponse {
                    idea_id: idea.id,
                    remaining_runs,
                }),
            ))
        }
        // A concurrent submission spent the last credit.
        IdeaSubmission::QuotaExhausted => Err(quota_exhausted().into()),
    }
}

/// GET /api/ideas
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Idea>>>> {
    let ideas = IdeaRepo::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: ideas }))
}

/// GET /api/ideas/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Idea>> {
    let idea = load_owned_idea(&state.pool, id, auth.user_id).await?;
    Ok(Json(idea))
}

/// DELETE /api/ideas/{id}
///
/// Stages and messages go with the idea.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned_idea(&state.pool, id, auth.user_id).await?;

    if IdeaRepo::delete(&state.pool, id).await? {
        tracing::info!(idea_id = id, user_id = auth.user_id, "Idea deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Idea",
            id,
        }))
    }
}

/// Load an idea and check that `user_id` owns it.
///
/// 404 if the idea does not exist, 403 if it belongs to someone else.
pub(crate) async fn load_owned_idea(pool: &DbPool, id: DbId, user_id: DbId) -> AppResult<Idea> {
    let idea = IdeaRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Idea",
            id,
        }))?;

    if idea.user_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this idea".into(),
        )));
    }
    Ok(idea)
}
