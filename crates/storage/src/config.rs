/// Object storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services. `None` uses AWS.
    pub endpoint: Option<String>,
    /// Static credentials. When absent the default AWS provider chain is used.
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Template for public object URLs with `{bucket}` and `{key}` placeholders.
    pub public_url_template: String,
}

const DEFAULT_REGION: &str = "us-east-1";

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                       | Default                                         |
    /// |-------------------------------|-------------------------------------------------|
    /// | `S3_BUCKET`                   | **required**                                    |
    /// | `S3_REGION`                   | `us-east-1`                                     |
    /// | `S3_ENDPOINT`                 | unset                                           |
    /// | `S3_ACCESS_KEY`               | unset                                           |
    /// | `S3_SECRET_KEY`               | unset                                           |
    /// | `STORAGE_PUBLIC_URL_TEMPLATE` | `https://{bucket}.s3.{region}.amazonaws.com/{key}` |
    ///
    /// # Panics
    ///
    /// Panics if `S3_BUCKET` is not set.
    pub fn from_env() -> Self {
        let bucket = std::env::var("S3_BUCKET").expect("S3_BUCKET must be set in the environment");
        let region = std::env::var("S3_REGION").unwrap_or_else(|_| DEFAULT_REGION.into());
        let public_url_template = std::env::var("STORAGE_PUBLIC_URL_TEMPLATE")
            .unwrap_or_else(|_| format!("https://{{bucket}}.s3.{region}.amazonaws.com/{{key}}"));

        Self {
            bucket,
            region,
            endpoint: non_empty_var("S3_ENDPOINT"),
            access_key: non_empty_var("S3_ACCESS_KEY"),
            secret_key: non_empty_var("S3_SECRET_KEY"),
            public_url_template,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Render a public URL from a template containing `{bucket}` and `{key}`.
pub fn public_url_from_template(template: &str, bucket: &str, key: &str) -> String {
    template.replace("{bucket}", bucket).replace("{key}", key)
}
