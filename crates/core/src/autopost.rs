//! Decisions made by the social auto-poster.
//!
//! Cooldown windows, the recent-post lookback, draft prompt and parsing,
//! subreddit allow-listing and OAuth expiry detection.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pages posted within this many days are not picked again.
pub const RECENT_POST_LOOKBACK_DAYS: i64 = 7;

/// Reddit rejects titles longer than this.
pub const MAX_TITLE_CHARS: usize = 300;

/// Platform name stored on connections and posts.
pub const PLATFORM_REDDIT: &str = "reddit";

static BRACE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"));

// ---------------------------------------------------------------------------
// Cooldown
// ---------------------------------------------------------------------------

/// Whether enough time has passed since the last post.
///
/// A connection that has never posted is always due.
pub fn cooldown_elapsed(last_posted_at: Option<Timestamp>, interval_hours: i32, now: Timestamp) -> bool {
    match last_posted_at {
        None => true,
        Some(last) => now - last >= chrono::Duration::hours(i64::from(interval_hours.max(0))),
    }
}

/// Oldest post time that still blocks a page from being picked again.
pub fn recent_post_cutoff(now: Timestamp) -> Timestamp {
    now - chrono::Duration::days(RECENT_POST_LOOKBACK_DAYS)
}

// ---------------------------------------------------------------------------
// Drafting
// ---------------------------------------------------------------------------

/// Post content proposed by the language model.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub subreddit: Option<String>,
}

/// System instruction for drafting a post.
pub const DRAFT_SYSTEM_PROMPT: &str = "You are a friendly parent who shares printable \
     coloring pages online. Write like a real person, casual and short, never like an ad. \
     Reply with a single JSON object and nothing else.";

/// Build the drafting prompt for one coloring page.
pub fn build_draft_prompt(
    page_title: &str,
    page_description: Option<&str>,
    category: &str,
    allowed_subreddits: &[String],
) -> String {
    format!(
        "I want to share this free coloring page.\n\
         Title: {page_title}\n\
         Description: {}\n\
         Category: {category}\n\n\
         Pick the best subreddit from this list: {}.\n\
         Return JSON: {{\"title\": \"...\", \"body\": \"...\", \"subreddit\": \"...\"}}. \
         Keep the title under 120 characters and the body to one or two sentences.",
        page_description.unwrap_or("(none)"),
        allowed_subreddits.join(", "),
    )
}

/// Parse a draft from a model reply by locating the first `{...}` span.
pub fn parse_draft(reply: &str) -> Result<PostDraft, CoreError> {
    let span = BRACE_SPAN
        .find(reply)
        .ok_or_else(|| CoreError::Validation("Draft reply contains no JSON object".into()))?;
    let mut draft: PostDraft = serde_json::from_str(span.as_str())
        .map_err(|e| CoreError::Validation(format!("Draft reply is not valid JSON: {e}")))?;
    draft.title = truncate_title(draft.title.trim());
    if draft.title.is_empty() {
        return Err(CoreError::Validation("Draft title is empty".into()));
    }
    Ok(draft)
}

/// Truncate a title to [`MAX_TITLE_CHARS`] characters.
pub fn truncate_title(title: &str) -> String {
    title.chars().take(MAX_TITLE_CHARS).collect()
}

/// Normalize a subreddit name: strip `/r/` or `r/` and surrounding whitespace.
pub fn normalize_subreddit(name: &str) -> &str {
    let trimmed = name.trim().trim_start_matches('/');
    trimmed
        .strip_prefix("r/")
        .or_else(|| trimmed.strip_prefix("R/"))
        .unwrap_or(trimmed)
}

/// Resolve the target subreddit against the allow-list.
///
/// The suggestion wins when it is allowed (case-insensitive); otherwise the
/// first allowed subreddit is used. `None` when the allow-list is empty.
pub fn choose_subreddit(suggested: Option<&str>, allowed: &[String]) -> Option<String> {
    if let Some(wanted) = suggested.map(normalize_subreddit) {
        if let Some(hit) = allowed
            .iter()
            .find(|a| normalize_subreddit(a).eq_ignore_ascii_case(wanted))
        {
            return Some(normalize_subreddit(hit).to_string());
        }
    }
    allowed.first().map(|a| normalize_subreddit(a).to_string())
}

// ---------------------------------------------------------------------------
// OAuth expiry detection
// ---------------------------------------------------------------------------

/// Whether a failed API response means the access token has expired.
///
/// HTTP 401 is the primary signal. An HTML body on an API endpoint is
/// treated the same way, since Reddit answers stale tokens with a login
/// page on some endpoints.
pub fn is_token_expired(status: u16, content_type: Option<&str>) -> bool {
    status == 401
        || content_type
            .map(|ct| ct.to_ascii_lowercase().starts_with("text/html"))
            .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
