//! Handlers for persona stages nested under `/ideas/{idea_id}/stages`.
//!
//! Every handler resolves idea ownership before touching the stage, so a
//! caller who does not own the idea learns nothing about its stages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use planform_core::error::CoreError;
use planform_core::persona::Persona;
use planform_core::stage::{ensure_open, validate_message_content, MessageRole};
use planform_core::types::DbId;
use planform_db::models::stage::{AppendOutcome, CreateMessage, Message, Stage};
use planform_db::repositories::StageRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::idea::load_owned_idea;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response body for `GET .../stages/{stage_name}`.
///
/// `{"exists": false}` for a persona the user has not started yet.
#[derive(Debug, Serialize)]
pub struct StageView {
    pub exists: bool,
    #[serde(flatten)]
    pub detail: Option<StageDetail>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDetail {
    pub stage_id: DbId,
    pub completed: bool,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: DbId,
    pub role: String,
    pub content: String,
}

impl From<Message> for MessageView {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            role: m.role,
            content: m.content,
        }
    }
}

/// Request body for `POST .../messages`.
#[derive(Debug, Deserialize)]
pub struct AppendMessageRequest {
    pub role: String,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/ideas/{idea_id}/stages/{stage_name}
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((idea_id, stage_name)): Path<(DbId, String)>,
) -> AppResult<Json<StageView>> {
    let persona: Persona = stage_name.parse()?;
    load_owned_idea(&state.pool, idea_id, auth.user_id).await?;

    let Some(stage) = StageRepo::find(&state.pool, idea_id, persona).await? else {
        return Ok(Json(StageView {
            exists: false,
            detail: None,
        }));
    };

    let messages = StageRepo::list_messages(&state.pool, stage.id).await?;
    Ok(Json(StageView {
        exists: true,
        detail: Some(StageDetail {
            stage_id: stage.id,
            completed: stage.is_completed(),
            messages: messages.into_iter().map(MessageView::from).collect(),
        }),
    }))
}

/// POST /api/ideas/{idea_id}/stages/{stage_name}/messages
///
/// Starts the stage on its first message. Completed stages are read-only.
pub async fn append_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((idea_id, stage_name)): Path<(DbId, String)>,
    Json(input): Json<AppendMessageRequest>,
) -> AppResult<(StatusCode, Json<Message>)> {
    let persona: Persona = stage_name.parse()?;
    let role: MessageRole = input.role.parse()?;
    validate_message_content(&input.content)?;
    load_owned_idea(&state.pool, idea_id, auth.user_id).await?;

    let create = CreateMessage {
        role: role.as_str().to_string(),
        content: input.content,
    };
    match StageRepo::append_message(&state.pool, idea_id, persona, &create).await? {
        AppendOutcome::Appended { stage, message } => {
            tracing::debug!(stage_id = stage.id, message_id = message.id, %role, "Message appended");
            Ok((StatusCode::CREATED, Json(message)))
        }
        AppendOutcome::StageCompleted { stage } => Err(AppError::Core(CoreError::Conflict(
            format!("The {persona} stage (id {}) is completed and read-only", stage.id),
        ))),
    }
}

/// POST /api/ideas/{idea_id}/stages/{stage_name}/complete
///
/// Completion happens exactly once; a second call is a 409.
pub async fn complete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((idea_id, stage_name)): Path<(DbId, String)>,
) -> AppResult<Json<Stage>> {
    let persona: Persona = stage_name.parse()?;
    load_owned_idea(&state.pool, idea_id, auth.user_id).await?;

    if let Some(stage) = StageRepo::complete(&state.pool, idea_id, persona).await? {
        tracing::info!(stage_id = stage.id, idea_id, %persona, "Stage completed");
        return Ok(Json(stage));
    }

    // Nothing transitioned: either the stage was never started or it is
    // already complete.
    let stage = StageRepo::find(&state.pool, idea_id, persona)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("The {persona} stage has not been started"))
        })?;
    ensure_open(stage.completed_at)?;

    Err(AppError::Core(CoreError::Conflict(format!(
        "The {persona} stage changed concurrently, retry"
    ))))
}
