//! AI generation tracking rows.
//!
//! One row per image a metered user asked for. Rows are created in the
//! `processing` state before the image model is called and moved to
//! `completed` (with the public URL) or `failed` afterwards.

use serde::Serialize;
use sqlx::FromRow;
use colorbook_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// A row from the `ai_generations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiGeneration {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub prompt: String,
    pub image_url: Option<String>,
    pub cost_type: String,
    pub status_id: StatusId,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// Input for opening a generation row in the `processing` state.
#[derive(Debug, Clone)]
pub struct CreateAiGeneration {
    pub user_id: Option<DbId>,
    pub prompt: String,
    pub cost_type: String,
}
