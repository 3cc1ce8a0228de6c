//! Social media connection and post rows.

use serde::Serialize;
use sqlx::FromRow;
use colorbook_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// A row from the `social_media_connections` table.
///
/// Tokens are never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SocialConnection {
    pub id: DbId,
    pub user_id: DbId,
    pub platform: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<Timestamp>,
    pub auto_post_enabled: bool,
    pub post_interval_hours: i32,
    pub allowed_subreddits: Vec<String>,
    pub last_auto_post_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `social_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SocialPost {
    pub id: DbId,
    pub user_id: DbId,
    pub connection_id: DbId,
    pub coloring_page_id: Option<DbId>,
    pub platform: String,
    pub subreddit: Option<String>,
    pub title: String,
    pub body: Option<String>,
    pub post_url: Option<String>,
    pub status_id: StatusId,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
}

/// Input for recording one post attempt.
#[derive(Debug, Clone)]
pub struct CreateSocialPost {
    pub user_id: DbId,
    pub connection_id: DbId,
    pub coloring_page_id: Option<DbId>,
    pub platform: String,
    pub subreddit: Option<String>,
    pub title: String,
    pub body: Option<String>,
    pub post_url: Option<String>,
    pub status_id: StatusId,
    pub error_message: Option<String>,
}
