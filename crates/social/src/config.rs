/// Reddit application credentials loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    /// Base URL for authenticated API calls.
    pub api_base: String,
    /// Token endpoint used for refresh grants.
    pub token_url: String,
}

const DEFAULT_USER_AGENT: &str = "colorbook-autoposter/0.1";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";
const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

impl RedditConfig {
    /// Load Reddit configuration from environment variables.
    ///
    /// | Env Var                | Required | Default                                      |
    /// |------------------------|----------|----------------------------------------------|
    /// | `REDDIT_CLIENT_ID`     | **yes**  | --                                           |
    /// | `REDDIT_CLIENT_SECRET` | **yes**  | --                                           |
    /// | `REDDIT_USER_AGENT`    | no       | `colorbook-autoposter/0.1`                   |
    /// | `REDDIT_API_BASE`      | no       | `https://oauth.reddit.com`                   |
    /// | `REDDIT_TOKEN_URL`     | no       | `https://www.reddit.com/api/v1/access_token` |
    ///
    /// # Panics
    ///
    /// Panics if the client id or secret is missing.
    pub fn from_env() -> Self {
        Self {
            client_id: std::env::var("REDDIT_CLIENT_ID")
                .expect("REDDIT_CLIENT_ID must be set in the environment"),
            client_secret: std::env::var("REDDIT_CLIENT_SECRET")
                .expect("REDDIT_CLIENT_SECRET must be set in the environment"),
            user_agent: std::env::var("REDDIT_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.into()),
            api_base: std::env::var("REDDIT_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.into())
                .trim_end_matches('/')
                .to_string(),
            token_url: std::env::var("REDDIT_TOKEN_URL")
                .unwrap_or_else(|_| DEFAULT_TOKEN_URL.into()),
        }
    }
}
