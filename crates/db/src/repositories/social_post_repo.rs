//! Repository for the `social_posts` table.

use sqlx::PgPool;
use colorbook_core::types::DbId;

use crate::models::social::{CreateSocialPost, SocialPost};

/// Column list for social_posts queries.
const COLUMNS: &str = "id, user_id, connection_id, coloring_page_id, platform, subreddit, \
    title, body, post_url, status_id, error_message, created_at";

/// Append-only record of auto-post attempts.
pub struct SocialPostRepo;

impl SocialPostRepo {
    /// Record one post attempt.
    pub async fn create(pool: &PgPool, input: &CreateSocialPost) -> Result<SocialPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO social_posts
                (user_id, connection_id, coloring_page_id, platform, subreddit,
                 title, body, post_url, status_id, error_message)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SocialPost>(&query)
            .bind(input.user_id)
            .bind(input.connection_id)
            .bind(input.coloring_page_id)
            .bind(&input.platform)
            .bind(&input.subreddit)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.post_url)
            .bind(input.status_id)
            .bind(&input.error_message)
            .fetch_one(pool)
            .await
    }

    /// List attempts for a connection, newest first.
    pub async fn list_for_connection(
        pool: &PgPool,
        connection_id: DbId,
    ) -> Result<Vec<SocialPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM social_posts
             WHERE connection_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SocialPost>(&query)
            .bind(connection_id)
            .fetch_all(pool)
            .await
    }
}
