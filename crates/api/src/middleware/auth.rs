//! Bearer-credential extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use colorbook_core::api_keys::matches_api_key;
use colorbook_core::error::CoreError;
use colorbook_core::roles::ROLE_ADMIN;
use colorbook_core::types::DbId;
use colorbook_pipeline::Caller;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// A user authenticated by a JWT Bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name.
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Whoever presented the `Authorization: Bearer` credential.
#[derive(Debug, Clone)]
pub enum Principal {
    /// The configured service API key.
    Service,
    /// A JWT-authenticated user.
    User(AuthUser),
}

impl Principal {
    /// Service-key holders and administrators are trusted.
    pub fn is_trusted(&self) -> bool {
        match self {
            Self::Service => true,
            Self::User(user) => user.is_admin(),
        }
    }

    /// Billing identity for generation requests: trusted principals are
    /// unmetered, everyone else pays.
    pub fn caller(&self) -> Caller {
        match self {
            Self::User(user) if !user.is_admin() => Caller::User {
                user_id: user.user_id,
            },
            _ => Caller::System,
        }
    }
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        if let Some(hash) = &state.config.service_key_hash {
            if matches_api_key(token, hash) {
                return Ok(Principal::Service);
            }
        }

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(Principal::User(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        }))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Principal::from_request_parts(parts, state).await? {
            Principal::User(user) => Ok(user),
            Principal::Service => Err(AppError::Core(CoreError::Forbidden(
                "The service key does not identify a user".into(),
            ))),
        }
    }
}
