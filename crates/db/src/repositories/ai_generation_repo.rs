//! Repository for the `ai_generations` table.

use sqlx::PgPool;
use colorbook_core::types::DbId;

use crate::models::ai_generation::{AiGeneration, CreateAiGeneration};
use crate::models::status::GenerationStatus;

/// Column list for ai_generations queries.
const COLUMNS: &str = "id, user_id, prompt, image_url, cost_type, status_id, \
    error_message, created_at, completed_at";

/// Tracks individual image generations. Rows are never deleted here.
pub struct AiGenerationRepo;

impl AiGenerationRepo {
    /// Open a generation row in the `processing` state.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAiGeneration,
    ) -> Result<AiGeneration, sqlx::Error> {
        let query = format!(
            "INSERT INTO ai_generations (user_id, prompt, cost_type, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AiGeneration>(&query)
            .bind(input.user_id)
            .bind(&input.prompt)
            .bind(&input.cost_type)
            .bind(GenerationStatus::Processing.id())
            .fetch_one(pool)
            .await
    }

    /// Mark a generation completed with its public image URL.
    /// Returns `true` if a row was updated.
    pub async fn complete(pool: &PgPool, id: DbId, image_url: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ai_generations
             SET status_id = $1, image_url = $2, completed_at = now()
             WHERE id = $3",
        )
        .bind(GenerationStatus::Completed.id())
        .bind(image_url)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a generation failed with a reason.
    /// Returns `true` if a row was updated.
    pub async fn fail(pool: &PgPool, id: DbId, error_message: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ai_generations
             SET status_id = $1, error_message = $2, completed_at = now()
             WHERE id = $3",
        )
        .bind(GenerationStatus::Failed.id())
        .bind(error_message)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a generation by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AiGeneration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_generations WHERE id = $1");
        sqlx::query_as::<_, AiGeneration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's generations, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AiGeneration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ai_generations
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, AiGeneration>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
