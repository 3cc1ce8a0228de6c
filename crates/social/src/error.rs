/// Errors from social platform calls and the auto-post run.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform no longer accepts the access token.
    #[error("Access token expired")]
    TokenExpired,

    /// The connection has no refresh token to renew an expired one with.
    #[error("Access token expired and no refresh token is stored")]
    NoRefreshToken,

    /// The platform accepted the request but refused the post.
    #[error("Post rejected: {0}")]
    Rejected(String),

    #[error("Platform error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
