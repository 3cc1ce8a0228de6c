//! Coloring page models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use colorbook_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `coloring_pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColoringPage {
    pub id: DbId,
    pub category_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub difficulty: String,
    pub series_id: Option<Uuid>,
    pub series_order: Option<i32>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A published page joined with its category name, as picked by the
/// auto-poster.
#[derive(Debug, Clone, FromRow)]
pub struct PageCandidate {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub category_name: String,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for inserting one page of a published series.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSeriesPage {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub series_order: i32,
}

/// One image of a generated series submitted for publishing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishSeriesImage {
    pub image_url: String,
    pub scene_description: String,
    pub order: i32,
}

/// Request body for publishing a generated series as coloring pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishSeriesRequest {
    pub category_id: DbId,
    pub series_title: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    pub images: Vec<PublishSeriesImage>,
}

impl PublishSeriesRequest {
    /// Page rows for the series, titled `"{series_title} - Part {order}"`.
    pub fn pages(&self) -> Vec<CreateSeriesPage> {
        let title = self.series_title.trim();
        self.images
            .iter()
            .map(|img| CreateSeriesPage {
                title: format!("{title} - Part {}", img.order),
                description: Some(img.scene_description.clone()),
                image_url: img.image_url.clone(),
                series_order: img.order,
            })
            .collect()
    }
}
