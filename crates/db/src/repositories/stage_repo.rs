//! Repository for the `stages` and `messages` tables.

use planform_core::persona::Persona;
use planform_core::types::DbId;
use sqlx::PgPool;

use crate::models::stage::{AppendOutcome, CreateMessage, Message, Stage};

const STAGE_COLUMNS: &str = "id, idea_id, persona, completed_at, created_at, updated_at";

const MESSAGE_COLUMNS: &str = "id, stage_id, role, content, created_at";

/// Provides stage progression operations.
pub struct StageRepo;

impl StageRepo {
    /// Find the stage for an idea and persona, if it has been started.
    pub async fn find(
        pool: &PgPool,
        idea_id: DbId,
        persona: Persona,
    ) -> Result<Option<Stage>, sqlx::Error> {
        let query =
            format!("SELECT {STAGE_COLUMNS} FROM stages WHERE idea_id = $1 AND persona = $2");
        sqlx::query_as::<_, Stage>(&query)
            .bind(idea_id)
            .bind(persona.as_str())
            .fetch_optional(pool)
            .await
    }

    /// List a stage's messages, oldest first.
    pub async fn list_messages(pool: &PgPool, stage_id: DbId) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE stage_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(stage_id)
            .fetch_all(pool)
            .await
    }

    /// Append a message, creating the stage on first use.
    ///
    /// Runs in a transaction holding a row lock on the stage so a concurrent
    /// completion cannot interleave with the append. Completed stages are left
    /// untouched and reported as [`AppendOutcome::StageCompleted`].
    pub async fn append_message(
        pool: &PgPool,
        idea_id: DbId,
        persona: Persona,
        input: &CreateMessage,
    ) -> Result<AppendOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO stages (idea_id, persona) VALUES ($1, $2)
             ON CONFLICT (idea_id, persona) DO NOTHING",
        )
        .bind(idea_id)
        .bind(persona.as_str())
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "SELECT {STAGE_COLUMNS} FROM stages
             WHERE idea_id = $1 AND persona = $2
             FOR UPDATE"
        );
        let stage = sqlx::query_as::<_, Stage>(&query)
            .bind(idea_id)
            .bind(persona.as_str())
            .fetch_one(&mut *tx)
            .await?;

        if stage.is_completed() {
            tx.rollback().await?;
            return Ok(AppendOutcome::StageCompleted { stage });
        }

        let query = format!(
            "INSERT INTO messages (stage_id, role, content)
             VALUES ($1, $2, $3)
             RETURNING {MESSAGE_COLUMNS}"
        );
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(stage.id)
            .bind(&input.role)
            .bind(&input.content)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AppendOutcome::Appended { stage, message })
    }

    /// Mark a stage completed.
    ///
    /// Only an in-progress stage transitions; returns `None` if the stage does
    /// not exist or was already completed.
    pub async fn complete(
        pool: &PgPool,
        idea_id: DbId,
        persona: Persona,
    ) -> Result<Option<Stage>, sqlx::Error> {
        let query = format!(
            "UPDATE stages SET completed_at = NOW()
             WHERE idea_id = $1 AND persona = $2 AND completed_at IS NULL
             RETURNING {STAGE_COLUMNS}"
        );
        sqlx::query_as::<_, Stage>(&query)
            .bind(idea_id)
            .bind(persona.as_str())
            .fetch_optional(pool)
            .await
    }
}
