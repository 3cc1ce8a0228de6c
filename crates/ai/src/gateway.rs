//! HTTP client for the OpenAI-compatible model gateway.
//!
//! Wraps `POST {api_url}/chat/completions` using [`reqwest`]. Calls are
//! single-shot: no retry, the caller decides what a failure means.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::AiConfig;
use crate::error::AiError;
use crate::messages::{ChatMessage, ChatRequest, ChatResponse};
use crate::{ImageModel, TextModel};

/// Client for one gateway account, serving both text and image models.
#[derive(Debug, Clone)]
pub struct AiGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl AiGateway {
    /// Build a gateway client from configuration.
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("colorbook/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    /// Send one chat-completions request and decode the response.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, AiError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<ChatResponse>().await?)
    }

    /// Ensure the response has a success status code, mapping the
    /// gateway's throttling and billing statuses to dedicated variants.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(AiError::RateLimited),
            StatusCode::PAYMENT_REQUIRED => Err(AiError::PaymentRequired),
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<unreadable body>".to_string());
                Err(AiError::Api {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

#[async_trait]
impl TextModel for AiGateway {
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String, AiError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let request = ChatRequest {
            model: self.text_model.clone(),
            messages,
            modalities: None,
        };
        let response = self.send(&request).await?;
        response
            .text()
            .map(str::to_owned)
            .ok_or(AiError::EmptyResponse)
    }
}

#[async_trait]
impl ImageModel for AiGateway {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, AiError> {
        let request = ChatRequest {
            model: self.image_model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            modalities: Some(vec!["image", "text"]),
        };
        let response = self.send(&request).await?;
        let image = response.first_image_url().map(str::to_owned);
        if image.is_none() {
            tracing::warn!(
                model = %self.image_model,
                reply = response.text().unwrap_or_default(),
                "Image model answered without an image"
            );
        }
        Ok(image)
    }
}
