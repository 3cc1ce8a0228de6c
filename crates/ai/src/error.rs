/// Errors from the model gateway.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway throttled the request.
    #[error("Model gateway rate limit exceeded")]
    RateLimited,

    /// The gateway account has run out of funds.
    #[error("Model gateway credits exhausted")]
    PaymentRequired,

    /// Any other non-2xx response.
    #[error("Model gateway error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response that carried no usable choice.
    #[error("Model gateway returned an empty response")]
    EmptyResponse,
}
