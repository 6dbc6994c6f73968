//! Stage and message models.

use planform_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `stages` table: one persona conversation on one idea.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: DbId,
    pub idea_id: DbId,
    pub persona: String,
    /// `None` while the stage is in progress. Never cleared once set.
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Stage {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// A row from the `messages` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: DbId,
    pub stage_id: DbId,
    pub role: String,
    pub content: String,
    pub created_at: Timestamp,
}

/// DTO for appending a message.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub role: String,
    pub content: String,
}

/// Result of appending a message to a persona stage.
#[derive(Debug)]
pub enum AppendOutcome {
    Appended { stage: Stage, message: Message },
    /// The stage is completed; nothing was written.
    StageCompleted { stage: Stage },
}
