//! One pass of the social auto-poster.

use std::future::Future;
use std::sync::Arc;

use rand::seq::IndexedRandom;
use serde::Serialize;
use sqlx::PgPool;

use colorbook_ai::TextModel;
use colorbook_core::autopost::{
    build_draft_prompt, choose_subreddit, cooldown_elapsed, parse_draft, recent_post_cutoff,
    PostDraft, DRAFT_SYSTEM_PROMPT, PLATFORM_REDDIT,
};
use colorbook_core::types::{DbId, Timestamp};
use colorbook_db::models::coloring_page::PageCandidate;
use colorbook_db::models::social::{CreateSocialPost, SocialConnection};
use colorbook_db::models::status::SocialPostStatus;
use colorbook_db::repositories::{ColoringPageRepo, SocialConnectionRepo, SocialPostRepo};

use crate::error::SocialError;
use crate::{LinkSubmission, SocialPlatform};

/// How many candidate pages are loaded per connection before the random pick.
const CANDIDATE_POOL_SIZE: i64 = 100;

/// Counters for one auto-post pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AutoPostSummary {
    /// Connections looked at.
    pub processed: u32,
    pub posted: u32,
    /// Still cooling down, nothing to post, or no allowed subreddit.
    pub skipped: u32,
    pub failed: u32,
}

enum Attempt {
    Posted,
    Skipped(&'static str),
    Failed,
}

/// Drafts and submits posts for every enabled connection.
#[derive(Clone)]
pub struct AutoPoster {
    pool: PgPool,
    text: Arc<dyn TextModel>,
    platform: Arc<dyn SocialPlatform>,
}

impl AutoPoster {
    pub fn new(pool: PgPool, text: Arc<dyn TextModel>, platform: Arc<dyn SocialPlatform>) -> Self {
        Self {
            pool,
            text,
            platform,
        }
    }

    /// Run one pass over all enabled connections.
    ///
    /// Only the initial connection query can fail the pass; per-connection
    /// errors are logged and counted.
    pub async fn run_once(&self, now: Timestamp) -> Result<AutoPostSummary, SocialError> {
        let connections = SocialConnectionRepo::list_auto_post_enabled(&self.pool, PLATFORM_REDDIT).await?;
        let mut summary = AutoPostSummary::default();

        for connection in &connections {
            summary.processed += 1;
            match self.process(connection, now).await {
                Ok(Attempt::Posted) => summary.posted += 1,
                Ok(Attempt::Failed) => summary.failed += 1,
                Ok(Attempt::Skipped(reason)) => {
                    tracing::debug!(connection_id = connection.id, reason, "Auto-post skipped");
                    summary.skipped += 1;
                }
                Err(e) => {
                    tracing::error!(connection_id = connection.id, error = %e, "Auto-post failed");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            processed = summary.processed,
            posted = summary.posted,
            skipped = summary.skipped,
            failed = summary.failed,
            "Auto-post pass finished",
        );
        Ok(summary)
    }

    async fn process(&self, connection: &SocialConnection, now: Timestamp) -> Result<Attempt, SocialError> {
        if !cooldown_elapsed(connection.last_auto_post_at, connection.post_interval_hours, now) {
            return Ok(Attempt::Skipped("cooldown"));
        }
        if connection.allowed_subreddits.is_empty() {
            return Ok(Attempt::Skipped("no allowed subreddits"));
        }

        let candidates = self.candidates(connection, now).await?;
        let Some(page) = candidates.choose(&mut rand::rng()) else {
            return Ok(Attempt::Skipped("no candidate pages"));
        };

        let draft = match self.draft(page, &connection.allowed_subreddits).await {
            Ok(draft) => draft,
            Err(reason) => {
                self.record(connection, page, None, &page.title, None, Err(reason)).await?;
                return Ok(Attempt::Failed);
            }
        };

        let Some(subreddit) = choose_subreddit(draft.subreddit.as_deref(), &connection.allowed_subreddits)
        else {
            return Ok(Attempt::Skipped("no allowed subreddits"));
        };
        let submission = LinkSubmission {
            subreddit,
            title: draft.title.clone(),
            url: page.image_url.clone(),
        };

        let outcome = self.submit_with_refresh(connection, &submission).await;
        let posted = outcome.is_ok();
        self.record(
            connection,
            page,
            Some(submission.subreddit.as_str()),
            &draft.title,
            Some(draft.body.as_str()),
            outcome.map_err(|e| e.to_string()),
        )
        .await?;

        if posted {
            // The post is live and recorded; a stale cooldown only delays the next one.
            match SocialConnectionRepo::mark_posted(&self.pool, connection.id, now).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(connection_id = connection.id, "Connection vanished before cooldown update")
                }
                Err(e) => {
                    tracing::warn!(connection_id = connection.id, error = %e, "Failed to update auto-post cooldown")
                }
            }
            tracing::info!(
                connection_id = connection.id,
                page_id = page.id,
                subreddit = %submission.subreddit,
                "Auto-posted coloring page",
            );
            Ok(Attempt::Posted)
        } else {
            Ok(Attempt::Failed)
        }
    }

    /// Pages not posted by this user within the lookback window. A failed
    /// filtered query falls back to the unfiltered pool.
    async fn candidates(
        &self,
        connection: &SocialConnection,
        now: Timestamp,
    ) -> Result<Vec<PageCandidate>, SocialError> {
        let cutoff = recent_post_cutoff(now);
        let filtered = ColoringPageRepo::list_candidates_not_posted_since(
            &self.pool,
            connection.user_id,
            cutoff,
            CANDIDATE_POOL_SIZE,
        )
        .await;
        or_unfiltered(
            filtered,
            ColoringPageRepo::list_candidates(&self.pool, CANDIDATE_POOL_SIZE),
            connection.user_id,
        )
        .await
    }

    async fn draft(&self, page: &PageCandidate, allowed: &[String]) -> Result<PostDraft, String> {
        let prompt = build_draft_prompt(
            &page.title,
            page.description.as_deref(),
            &page.category_name,
            allowed,
        );
        let reply = self
            .text
            .complete(Some(DRAFT_SYSTEM_PROMPT), &prompt)
            .await
            .map_err(|e| format!("Draft generation failed: {e}"))?;
        parse_draft(&reply).map_err(|e| e.to_string())
    }

    /// Submit once; on an expired token refresh it, persist it and retry
    /// exactly once.
    async fn submit_with_refresh(
        &self,
        connection: &SocialConnection,
        submission: &LinkSubmission,
    ) -> Result<String, SocialError> {
        match self.platform.submit_link(&connection.access_token, submission).await {
            Err(SocialError::TokenExpired) => {}
            other => return other,
        }

        let refresh_token = connection
            .refresh_token
            .as_deref()
            .ok_or(SocialError::NoRefreshToken)?;
        tracing::info!(connection_id = connection.id, "Access token expired, refreshing");

        let token = self.platform.refresh_token(refresh_token).await?;
        SocialConnectionRepo::update_tokens(
            &self.pool,
            connection.id,
            &token.access_token,
            token.refresh_token.as_deref(),
            token.expires_at,
        )
        .await?;

        self.platform.submit_link(&token.access_token, submission).await
    }

    async fn record(
        &self,
        connection: &SocialConnection,
        page: &PageCandidate,
        subreddit: Option<&str>,
        title: &str,
        body: Option<&str>,
        outcome: Result<String, String>,
    ) -> Result<(), SocialError> {
        let (status, post_url, error_message) = match outcome {
            Ok(url) => (SocialPostStatus::Posted, Some(url), None),
            Err(reason) => {
                tracing::warn!(connection_id = connection.id, reason = %reason, "Auto-post attempt failed");
                (SocialPostStatus::Failed, None, Some(reason))
            }
        };
        SocialPostRepo::create(
            &self.pool,
            &CreateSocialPost {
                user_id: connection.user_id,
                connection_id: connection.id,
                coloring_page_id: Some(page.id),
                platform: connection.platform.clone(),
                subreddit: subreddit.map(str::to_owned),
                title: title.to_string(),
                body: body.map(str::to_owned),
                post_url,
                status_id: status.id(),
                error_message,
            },
        )
        .await?;
        Ok(())
    }
}

/// Keep the filtered candidates, or await `unfiltered` when that query failed.
async fn or_unfiltered<T>(
    filtered: Result<Vec<T>, sqlx::Error>,
    unfiltered: impl Future<Output = Result<Vec<T>, sqlx::Error>>,
    user_id: DbId,
) -> Result<Vec<T>, SocialError> {
    match filtered {
        Ok(pages) => Ok(pages),
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Recent-post filter failed, using unfiltered pool");
            Ok(unfiltered.await?)
        }
    }
}
