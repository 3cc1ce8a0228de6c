//! Story-series request rules and image prompt construction.
//!
//! A series is an ordered set of line-art pages that share one recurring
//! character design. The first scene fixes the design; every later prompt
//! repeats the instruction to copy it exactly.

use crate::difficulty::Difficulty;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Smallest accepted series.
pub const MIN_SERIES_LENGTH: u32 = 3;
/// Largest accepted series.
pub const MAX_SERIES_LENGTH: u32 = 8;
/// Length used when the request does not name one.
pub const DEFAULT_SERIES_LENGTH: u32 = 5;

/// Longest accepted theme or single-page prompt.
pub const MAX_THEME_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Resolve the requested series length, applying the default and bounds.
pub fn resolve_series_length(requested: Option<i64>) -> Result<u32, CoreError> {
    let Some(value) = requested else {
        return Ok(DEFAULT_SERIES_LENGTH);
    };
    if value < i64::from(MIN_SERIES_LENGTH) || value > i64::from(MAX_SERIES_LENGTH) {
        return Err(CoreError::Validation(format!(
            "seriesLength must be between {MIN_SERIES_LENGTH} and {MAX_SERIES_LENGTH}, got {value}"
        )));
    }
    Ok(value as u32)
}

/// Validate a free-text theme or prompt. Returns the trimmed text.
pub fn validate_theme<'a>(field: &str, theme: &'a str) -> Result<&'a str, CoreError> {
    let trimmed = theme.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_THEME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_THEME_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate a category reference. Returns the trimmed value.
pub fn validate_category(category: &str) -> Result<&str, CoreError> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("category must not be empty".into()));
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Rules shared by every coloring-page image prompt.
const LINE_ART_RULES: &str = "Black and white line art coloring page. Pure white background. \
     Clean closed outlines only: no shading, no grayscale, no color fill, no text, no borders.";

/// Human-readable title for a generated series.
pub fn series_title(theme: &str) -> String {
    format!("{} Story Series", theme.trim())
}

/// Build the image prompt for one scene of a series.
///
/// `index` is zero-based. Scenes after the first carry an explicit
/// instruction to reproduce the character design from scene 1 verbatim.
pub fn build_scene_prompt(
    scene: &str,
    index: usize,
    total: usize,
    difficulty: Difficulty,
) -> String {
    let mut prompt = format!(
        "Create scene {} of {} in a story-based coloring book.\n\nScene: {}\n\n",
        index + 1,
        total,
        scene.trim()
    );
    if index > 0 {
        prompt.push_str(
            "CRITICAL: The main character must look EXACTLY as designed in scene 1. \
             Replicate the character design verbatim: same proportions, same face, same \
             clothing, same accessories. Only the pose, action and surroundings change.\n\n",
        );
    }
    prompt.push_str(difficulty.line_guidance());
    prompt.push_str("\n\n");
    prompt.push_str(LINE_ART_RULES);
    prompt
}

/// Build the image prompt for a standalone page.
pub fn build_page_prompt(description: &str, category: &str, difficulty: Difficulty) -> String {
    format!(
        "Create a {category} themed coloring page.\n\nSubject: {}\n\n{}\n\n{LINE_ART_RULES}",
        description.trim(),
        difficulty.line_guidance(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
