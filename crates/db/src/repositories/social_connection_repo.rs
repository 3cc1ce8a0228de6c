//! Repository for the `social_media_connections` table.

use sqlx::PgPool;
use colorbook_core::types::{DbId, Timestamp};

use crate::models::social::SocialConnection;

/// Column list for social_media_connections queries.
const COLUMNS: &str = "id, user_id, platform, username, access_token, refresh_token, \
    token_expires_at, auto_post_enabled, post_interval_hours, allowed_subreddits, \
    last_auto_post_at, created_at, updated_at";

/// Per-user platform connections and their auto-post configuration.
pub struct SocialConnectionRepo;

impl SocialConnectionRepo {
    /// All connections on `platform` with auto-posting enabled, oldest post first.
    pub async fn list_auto_post_enabled(
        pool: &PgPool,
        platform: &str,
    ) -> Result<Vec<SocialConnection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM social_media_connections
             WHERE auto_post_enabled = true AND platform = $1
             ORDER BY last_auto_post_at ASC NULLS FIRST, id ASC"
        );
        sqlx::query_as::<_, SocialConnection>(&query)
            .bind(platform)
            .fetch_all(pool)
            .await
    }

    /// Find a connection by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SocialConnection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM social_media_connections WHERE id = $1");
        sqlx::query_as::<_, SocialConnection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Store a refreshed OAuth token. A `None` refresh token keeps the old one.
    pub async fn update_tokens(
        pool: &PgPool,
        id: DbId,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: Option<Timestamp>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE social_media_connections
             SET access_token = $2,
                 refresh_token = COALESCE($3, refresh_token),
                 token_expires_at = $4,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(access_token)
        .bind(refresh_token)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the time of the latest successful auto-post.
    pub async fn mark_posted(pool: &PgPool, id: DbId, at: Timestamp) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE social_media_connections
             SET last_auto_post_at = $2, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
