//! Story outline prompt and reply parsing.
//!
//! The language model is asked for a JSON array of scene descriptions. Its
//! reply is free text, so the array is located by the first `[` ... last `]`
//! span and parsed as JSON. Element count and content are trusted.

use std::sync::LazyLock;

use regex::Regex;

use crate::difficulty::Difficulty;
use crate::error::CoreError;

static BRACKET_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("static regex is valid"));

/// System instruction sent with every outline request.
pub const OUTLINE_SYSTEM_PROMPT: &str = "You write short illustrated story outlines for \
     children's coloring books. Reply with a JSON array of strings and nothing else.";

/// Build the user prompt asking for `scene_count` scene descriptions.
pub fn build_outline_prompt(
    theme: &str,
    category: &str,
    difficulty: Difficulty,
    scene_count: u32,
) -> String {
    format!(
        "Write a {scene_count}-scene story about \"{theme}\" for a {category} coloring book \
         ({difficulty} difficulty).\n\
         Return a JSON array of exactly {scene_count} strings, one per scene, in story order.\n\
         In scene 1, describe the main character's appearance in precise visual detail \
         (species or body type, face, hair or fur, clothing, accessories). In every later \
         scene, repeat that exact character description word for word before describing \
         the new action and setting."
    )
}

/// Extract the scene list from a model reply.
///
/// Non-string elements are kept in their JSON text form.
pub fn extract_outline(reply: &str) -> Result<Vec<String>, CoreError> {
    let span = BRACKET_SPAN
        .find(reply)
        .ok_or_else(|| CoreError::Validation("Outline reply contains no JSON array".into()))?;

    let values: Vec<serde_json::Value> = serde_json::from_str(span.as_str())
        .map_err(|e| CoreError::Validation(format!("Outline reply is not valid JSON: {e}")))?;

    Ok(values
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}
