//! Coloring difficulty levels and their line-art presets.
//!
//! Difficulty drives only the wording of the image prompt: line thickness
//! and how much detail the model is allowed to draw.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Difficulty requested for a generated page or series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// All accepted difficulty names, in ascending order.
pub const VALID_DIFFICULTIES: &[&str] = &["easy", "medium", "hard"];

impl Difficulty {
    /// Parse from the wire / database name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(CoreError::Validation(format!(
                "Invalid difficulty '{other}'. Must be one of: {}",
                VALID_DIFFICULTIES.join(", ")
            ))),
        }
    }

    /// Wire / database name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Line-weight and detail guidance appended to every image prompt.
    pub fn line_guidance(self) -> &'static str {
        match self {
            Self::Easy => {
                "Use very thick, bold outlines (about 5-6px). Keep shapes large and simple \
                 with big open areas and minimal detail, suitable for young children."
            }
            Self::Medium => {
                "Use medium-weight outlines (about 3-4px). Include a moderate amount of \
                 detail with some simple patterns and textures."
            }
            Self::Hard => {
                "Use fine, thin outlines (about 1-2px). Include intricate detail, complex \
                 patterns and many small areas to color."
            }
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
