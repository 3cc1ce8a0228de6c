//! Reddit REST client.
//!
//! Posts go to `POST {api_base}/api/submit` with a bearer token; refreshes
//! go to the token endpoint with HTTP basic auth of the app credentials.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use colorbook_core::autopost::is_token_expired;

use crate::config::RedditConfig;
use crate::error::SocialError;
use crate::{LinkSubmission, RefreshedToken, SocialPlatform};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct RedditClient {
    client: reqwest::Client,
    config: RedditConfig,
}

impl RedditClient {
    pub fn new(config: RedditConfig) -> Result<Self, SocialError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    /// Map an expired-token signature to [`SocialError::TokenExpired`] and
    /// any other failure status to [`SocialError::Api`].
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, SocialError> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());

        if is_token_expired(status.as_u16(), content_type) {
            return Err(SocialError::TokenExpired);
        }
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(SocialError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SubmitEnvelope {
    json: SubmitBody,
}

#[derive(Debug, Deserialize)]
struct SubmitBody {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
    #[serde(default)]
    data: Option<SubmitData>,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Extract the post URL from a submit response, or the platform's reasons
/// for refusing it.
fn parse_submit(envelope: SubmitEnvelope) -> Result<String, SocialError> {
    if !envelope.json.errors.is_empty() {
        let reasons: Vec<String> = envelope.json.errors.iter().map(|e| e.to_string()).collect();
        return Err(SocialError::Rejected(reasons.join("; ")));
    }
    envelope
        .json
        .data
        .map(|d| d.url)
        .ok_or_else(|| SocialError::Rejected("Submit response carried no post URL".into()))
}

#[async_trait]
impl SocialPlatform for RedditClient {
    async fn submit_link(
        &self,
        access_token: &str,
        submission: &LinkSubmission,
    ) -> Result<String, SocialError> {
        let form = [
            ("api_type", "json"),
            ("kind", "link"),
            ("sr", submission.subreddit.as_str()),
            ("title", submission.title.as_str()),
            ("url", submission.url.as_str()),
            ("resubmit", "true"),
        ];
        let response = self
            .client
            .post(format!("{}/api/submit", self.config.api_base))
            .bearer_auth(access_token)
            .form(&form)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        parse_submit(response.json::<SubmitEnvelope>().await?)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedToken, SocialError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SocialError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(RefreshedToken {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token
                .expires_in
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
        })
    }
}
