//! Request and response shapes of the generation endpoints.

use serde::{Deserialize, Serialize};

use colorbook_core::difficulty::Difficulty;
use colorbook_core::error::CoreError;
use colorbook_core::series::{resolve_series_length, validate_category, validate_theme};
use colorbook_core::types::DbId;

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Body of a series generation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRequest {
    pub category: String,
    pub theme: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub series_length: Option<i64>,
}

/// A series request after defaults and bounds were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSeries {
    pub category: String,
    pub theme: String,
    pub difficulty: Difficulty,
    pub length: u32,
}

impl SeriesRequest {
    pub fn validate(&self) -> Result<ValidSeries, CoreError> {
        let category = validate_category(&self.category)?.to_string();
        let theme = validate_theme("theme", &self.theme)?.to_string();
        let difficulty = parse_difficulty(self.difficulty.as_deref())?;
        let length = resolve_series_length(self.series_length)?;
        Ok(ValidSeries {
            category,
            theme,
            difficulty,
            length,
        })
    }
}

/// One stored scene image, numbered densely from 1.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesImage {
    pub image_url: String,
    pub scene_description: String,
    pub order: u32,
    pub generation_id: Option<DbId>,
}

/// What happened to one scene of the outline.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SceneOutcome {
    Completed,
    /// The image model answered without an image.
    Skipped { reason: String },
    /// The model call, decoding or upload failed.
    Failed { reason: String },
}

impl SceneOutcome {
    /// Why the scene produced no image.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Completed => None,
            Self::Skipped { reason } | Self::Failed { reason } => Some(reason),
        }
    }
}

/// Outcome of one scene, keyed by its 1-based position in the outline.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SceneReport {
    pub scene_number: u32,
    #[serde(flatten)]
    pub outcome: SceneOutcome,
}

/// Result of a successful series generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResult {
    pub series_title: String,
    pub images: Vec<SeriesImage>,
    pub scenes: Vec<SceneReport>,
    pub category: String,
    pub difficulty: Difficulty,
    pub requested_length: u32,
}

impl SeriesResult {
    /// Whether every requested scene produced an image.
    pub fn is_complete(&self) -> bool {
        self.images.len() == self.requested_length as usize
    }
}

// ---------------------------------------------------------------------------
// Single page
// ---------------------------------------------------------------------------

/// Body of a single-page generation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub category: String,
    pub prompt: String,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// A page request after defaults were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPage {
    pub category: String,
    pub prompt: String,
    pub difficulty: Difficulty,
}

impl PageRequest {
    pub fn validate(&self) -> Result<ValidPage, CoreError> {
        Ok(ValidPage {
            category: validate_category(&self.category)?.to_string(),
            prompt: validate_theme("prompt", &self.prompt)?.to_string(),
            difficulty: parse_difficulty(self.difficulty.as_deref())?,
        })
    }
}

fn parse_difficulty(value: Option<&str>) -> Result<Difficulty, CoreError> {
    value.map(Difficulty::from_name).transpose().map(Option::unwrap_or_default)
}
