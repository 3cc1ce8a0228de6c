//! Access-token validation.
//!
//! Tokens are minted by the account service with a shared HS256 secret.
//! This server never issues them.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use colorbook_core::types::DbId;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's id.
    pub sub: DbId,
    /// `"admin"` or `"user"`.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Verification settings shared with the token issuer.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret, identical to the issuer's.
    pub secret: String,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
}

const DEFAULT_LEEWAY_SECS: u64 = 60;

impl JwtConfig {
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `JWT_LEEWAY_SECS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or the leeway is not a number.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        let leeway_secs = match std::env::var("JWT_LEEWAY_SECS") {
            Ok(v) => v.trim().parse().expect("JWT_LEEWAY_SECS must be a valid u64"),
            Err(_) => DEFAULT_LEEWAY_SECS,
        };

        Self {
            secret,
            leeway_secs,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

/// Check the signature and expiry of `token` and return its claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    decode::<Claims>(token, &key, &config.validation()).map(|data| data.claims)
}
