//! Repository for the `ideas` table.

use planform_core::types::DbId;
use sqlx::PgPool;

use crate::models::idea::{CreateIdea, Idea, IdeaSubmission};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, raw_idea, ideal_customer, problem, \
                        current_solutions, value_prop, created_at, updated_at";

/// Provides operations for ideas.
pub struct IdeaRepo;

impl IdeaRepo {
    /// Consume one run credit and insert the idea, atomically.
    ///
    /// Runs in a transaction: the guarded decrement and the insert commit
    /// together or not at all. If the user has no credits left the transaction
    /// is rolled back and [`IdeaSubmission::QuotaExhausted`] is returned.
    pub async fn create_with_run_debit(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateIdea,
    ) -> Result<IdeaSubmission, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let remaining_runs: Option<i32> = sqlx::query_scalar(
            "UPDATE users SET remaining_runs = remaining_runs - 1
             WHERE id = $1 AND remaining_runs > 0
             RETURNING remaining_runs",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(remaining_runs) = remaining_runs else {
            tx.rollback().await?;
            return Ok(IdeaSubmission::QuotaExhausted);
        };

        let query = format!(
            "INSERT INTO ideas
                (user_id, title, raw_idea, ideal_customer, problem, current_solutions, value_prop)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let idea = sqlx::query_as::<_, Idea>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.raw_idea)
            .bind(&input.ideal_customer)
            .bind(&input.problem)
            .bind(&input.current_solutions)
            .bind(&input.value_prop)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(idea_id = idea.id, user_id, remaining_runs, "Idea created");

        Ok(IdeaSubmission::Created {
            idea,
            remaining_runs,
        })
    }

    /// Find an idea by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ideas WHERE id = $1");
        sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's ideas, most recently created first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Idea>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ideas WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an idea. Stages and messages cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ideas WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
