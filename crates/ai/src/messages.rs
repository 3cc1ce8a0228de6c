//! Wire types for the chat-completions endpoint.

use serde::{Deserialize, Serialize};

/// One chat message in a request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Output modalities. Set to `["image", "text"]` for image generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<&'static str>>,
}

/// Response body of `POST /chat/completions`.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Vec<ResponseImage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseImage {
    pub image_url: ImageUrl,
}

#[derive(Debug, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatResponse {
    /// Text of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }

    /// First image URL of the first choice, usually a `data:` URI.
    pub fn first_image_url(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.images.first())
            .map(|img| img.image_url.url.as_str())
    }
}
