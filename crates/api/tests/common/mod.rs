#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jsonwebtoken::{encode, EncodingKey, Header};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use colorbook_ai::{AiError, ImageModel, TextModel};
use colorbook_api::auth::jwt::{Claims, JwtConfig};
use colorbook_api::config::ServerConfig;
use colorbook_api::router::build_app_router;
use colorbook_api::state::AppState;
use colorbook_core::api_keys::hash_api_key;
use colorbook_pipeline::Generator;
use colorbook_social::{AutoPoster, LinkSubmission, RefreshedToken, SocialError, SocialPlatform};
use colorbook_storage::{ObjectStore, StorageError};

pub const SERVICE_KEY: &str = "svc-test-key";
const JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Answers outline requests with eight scenes and draft requests with a post.
struct FakeText;

#[async_trait]
impl TextModel for FakeText {
    async fn complete(&self, system: Option<&str>, _prompt: &str) -> Result<String, AiError> {
        if system.is_some_and(|s| s.contains("JSON object")) {
            return Ok(r#"{"title": "Look what we colored", "body": "Free page.", "subreddit": "coloring"}"#.into());
        }
        let scenes: Vec<String> = (1..=8).map(|i| format!("\"Scene {i}\"")).collect();
        Ok(format!("[{}]", scenes.join(",")))
    }
}

struct FakeImage;

#[async_trait]
impl ImageModel for FakeImage {
    async fn generate_image(&self, _prompt: &str) -> Result<Option<String>, AiError> {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        Ok(Some(format!("data:image/png;base64,{}", STANDARD.encode(png))))
    }
}

struct FakeStore;

#[async_trait]
impl ObjectStore for FakeStore {
    async fn put_object(&self, _key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }
}

struct FakePlatform;

#[async_trait]
impl SocialPlatform for FakePlatform {
    async fn submit_link(&self, _token: &str, submission: &LinkSubmission) -> Result<String, SocialError> {
        Ok(format!("https://reddit.test/r/{}/1", submission.subreddit))
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Result<RefreshedToken, SocialError> {
        Err(SocialError::NoRefreshToken)
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            leeway_secs: 0,
        },
        service_key_hash: Some(hash_api_key(SERVICE_KEY)),
    }
}

/// Build the full application router, with the production middleware
/// stack, on top of fake models, storage and platform.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let generator = Generator::new(
        pool.clone(),
        Arc::new(FakeText),
        Arc::new(FakeImage),
        Arc::new(FakeStore),
    );
    let auto_poster = AutoPoster::new(pool.clone(), Arc::new(FakeText), Arc::new(FakePlatform));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        generator: Arc::new(generator),
        auto_poster: Arc::new(auto_poster),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Sign a token the way the account service does.
fn issue_token(user_id: i64, role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + 900,
        iat: now,
        jti: uuid::Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn user_token(user_id: i64) -> String {
    issue_token(user_id, "user")
}

pub fn admin_token(user_id: i64) -> String {
    issue_token(user_id, "admin")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------------

pub async fn seed_subscription(pool: &PgPool, user_id: i64, quota: i32, used: i32) {
    sqlx::query(
        "INSERT INTO user_subscriptions (user_id, monthly_quota, used_quota) VALUES ($1, $2, $3)",
    )
    .bind(user_id)
    .bind(quota)
    .bind(used)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_credits(pool: &PgPool, user_id: i64, balance: i32) {
    sqlx::query("INSERT INTO user_credits (user_id, balance) VALUES ($1, $2)")
        .bind(user_id)
        .bind(balance)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn seed_category(pool: &PgPool, slug: &str) -> i64 {
    let (id,): (i64,) =
        sqlx::query_as("INSERT INTO categories (name, slug) VALUES ($1, $1) RETURNING id")
            .bind(slug)
            .fetch_one(pool)
            .await
            .unwrap();
    id
}
