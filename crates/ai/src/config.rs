/// Model gateway configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base URL of the OpenAI-compatible API, without a trailing slash.
    pub api_url: String,
    /// Bearer key for the gateway.
    pub api_key: String,
    /// Model used for outlines and post drafts.
    pub text_model: String,
    /// Model used for line-art images.
    pub image_model: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Default gateway base URL.
const DEFAULT_API_URL: &str = "https://ai.gateway.lovable.dev/v1";
/// Default text model.
const DEFAULT_TEXT_MODEL: &str = "google/gemini-2.5-flash";
/// Default image model.
const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-flash-image-preview";
/// Default request timeout. Image generation regularly takes tens of seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

impl AiConfig {
    /// Load gateway configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default                                  |
    /// |---------------------------|----------|------------------------------------------|
    /// | `AI_API_URL`              | no       | `https://ai.gateway.lovable.dev/v1`      |
    /// | `AI_API_KEY`              | **yes**  | --                                       |
    /// | `AI_TEXT_MODEL`           | no       | `google/gemini-2.5-flash`                |
    /// | `AI_IMAGE_MODEL`          | no       | `google/gemini-2.5-flash-image-preview`  |
    /// | `AI_REQUEST_TIMEOUT_SECS` | no       | `120`                                    |
    ///
    /// # Panics
    ///
    /// Panics if `AI_API_KEY` is not set or is empty.
    pub fn from_env() -> Self {
        let api_key = std::env::var("AI_API_KEY").expect("AI_API_KEY must be set in the environment");
        assert!(!api_key.is_empty(), "AI_API_KEY must not be empty");

        let api_url = std::env::var("AI_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.into())
            .trim_end_matches('/')
            .to_string();

        let request_timeout_secs: u64 = std::env::var("AI_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("AI_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url,
            api_key,
            text_model: std::env::var("AI_TEXT_MODEL").unwrap_or_else(|_| DEFAULT_TEXT_MODEL.into()),
            image_model: std::env::var("AI_IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.into()),
            request_timeout_secs,
        }
    }
}
