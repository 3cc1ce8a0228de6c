//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`Principal`] and rejects requests that do not meet
//! the requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use colorbook_core::error::CoreError;

use super::auth::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the service key or the `admin` role. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(principal): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub Principal);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        if !principal.is_trusted() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(principal))
    }
}

/// Requires any valid credential.
///
/// Functionally equivalent to [`Principal`] but named for route
/// definitions where "this route requires authentication" should read
/// explicitly.
pub struct RequireAuth(pub Principal);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequireAuth(Principal::from_request_parts(parts, state).await?))
    }
}
