//! Clients for the hosted language and image models.
//!
//! The pipeline and the auto-poster depend only on the [`TextModel`] and
//! [`ImageModel`] traits; [`gateway::AiGateway`] implements both against an
//! OpenAI-compatible chat-completions endpoint.

pub mod config;
pub mod error;
pub mod gateway;
pub mod messages;

use async_trait::async_trait;

pub use config::AiConfig;
pub use error::AiError;
pub use gateway::AiGateway;

/// A hosted text-completion model.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Complete `prompt` under an optional system instruction and return the
    /// reply text.
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String, AiError>;
}

/// A hosted image-generation model.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Generate one image for `prompt`.
    ///
    /// Returns the image as a `data:` URI, or `None` when the model answered
    /// without an image.
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, AiError>;
}
