//! Social auto-posting of published coloring pages.
//!
//! [`AutoPoster`] walks every connection with auto-posting enabled, picks a
//! page that was not shared recently, has the text model draft a post and
//! submits it through a [`SocialPlatform`]. [`RedditClient`] is the only
//! platform implementation.

pub mod config;
pub mod error;
pub mod poster;
pub mod reddit;

use async_trait::async_trait;

use colorbook_core::types::Timestamp;

pub use config::RedditConfig;
pub use error::SocialError;
pub use poster::{AutoPostSummary, AutoPoster};
pub use reddit::RedditClient;

/// A link post to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSubmission {
    /// Target community, without the `r/` prefix.
    pub subreddit: String,
    pub title: String,
    pub url: String,
}

/// A freshly issued OAuth access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub access_token: String,
    /// Present when the provider rotated the refresh token.
    pub refresh_token: Option<String>,
    pub expires_at: Option<Timestamp>,
}

/// A platform that accepts link posts on behalf of a connected account.
#[async_trait]
pub trait SocialPlatform: Send + Sync {
    /// Submit a link post. Returns the URL of the created post.
    ///
    /// Must return [`SocialError::TokenExpired`] when the access token is
    /// no longer accepted, so the caller can refresh and retry.
    async fn submit_link(
        &self,
        access_token: &str,
        submission: &LinkSubmission,
    ) -> Result<String, SocialError>;

    /// Exchange a refresh token for a new access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedToken, SocialError>;
}
