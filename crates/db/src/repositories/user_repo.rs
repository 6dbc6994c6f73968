//! Repository for the `users` table.

use planform_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, name, password_hash, is_verified, \
                        verification_token_hash, remaining_runs, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, name, password_hash, verification_token_hash, remaining_runs)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.password_hash)
            .bind(&input.verification_token_hash)
            .bind(input.remaining_runs)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Read only the verification flag. `None` if the user does not exist.
    pub async fn is_verified(pool: &PgPool, id: DbId) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT is_verified FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark the user holding the given verification token hash as verified and
    /// consume the token.
    ///
    /// Returns the updated row, or `None` if no user holds that token.
    pub async fn verify_email(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET is_verified = true, verification_token_hash = NULL
             WHERE verification_token_hash = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the remaining-run counter (manual top-ups).
    ///
    /// Returns `false` if the user does not exist.
    pub async fn set_remaining_runs(
        pool: &PgPool,
        id: DbId,
        remaining_runs: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET remaining_runs = $2 WHERE id = $1")
            .bind(id)
            .bind(remaining_runs)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
