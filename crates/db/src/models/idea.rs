//! Idea entity model and DTOs.

use planform_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `ideas` table. Immutable once inserted.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub raw_idea: String,
    pub ideal_customer: String,
    pub problem: String,
    pub current_solutions: Option<String>,
    pub value_prop: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an idea.
#[derive(Debug, Clone)]
pub struct CreateIdea {
    pub title: String,
    pub raw_idea: String,
    pub ideal_customer: String,
    pub problem: String,
    pub current_solutions: Option<String>,
    pub value_prop: String,
}

/// Result of a run-debited idea submission.
#[derive(Debug)]
pub enum IdeaSubmission {
    /// The idea was inserted and one run credit consumed.
    Created { idea: Idea, remaining_runs: i32 },
    /// The user had no run credits; nothing was written.
    QuotaExhausted,
}
