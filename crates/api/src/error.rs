use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use colorbook_core::error::CoreError;
use colorbook_pipeline::PipelineError;
use colorbook_social::SocialError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `colorbook_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A fatal error from the generation pipeline.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A failed auto-post pass.
    #[error(transparent)]
    Social(#[from] SocialError),

    /// A resource addressed by something other than a numeric id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 402 carries the amounts alongside the standard fields.
        if let Some(CoreError::PaymentRequired {
            required,
            available_quota,
            available_credits,
        }) = self.core_error()
        {
            let body = json!({
                "error": self.to_string(),
                "code": "PAYMENT_REQUIRED",
                "required": required,
                "availableQuota": available_quota,
                "availableCredits": available_credits,
            });
            return (StatusCode::PAYMENT_REQUIRED, axum::Json(body)).into_response();
        }

        let (status, code, message) = match &self {
            AppError::Core(core) | AppError::Pipeline(PipelineError::Core(core)) => {
                classify_core_error(core)
            }

            AppError::Database(err) | AppError::Pipeline(PipelineError::Database(err)) => {
                classify_sqlx_error(err)
            }

            AppError::Pipeline(err @ (PipelineError::Outline(_) | PipelineError::NoImages { .. })) => {
                tracing::warn!(error = %err, "Generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_FAILED",
                    err.to_string(),
                )
            }
            AppError::Pipeline(err @ (PipelineError::Image(_) | PipelineError::Storage(_))) => {
                tracing::error!(error = %err, "Generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_FAILED",
                    "Image generation failed".to_string(),
                )
            }
            AppError::Pipeline(err @ (PipelineError::Billing(_) | PipelineError::Aborted(_))) => {
                internal(err)
            }

            AppError::Social(SocialError::Database(err)) => classify_sqlx_error(err),
            AppError::Social(err) => internal(err),

            // --- HTTP-specific errors ---
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl AppError {
    fn core_error(&self) -> Option<&CoreError> {
        match self {
            AppError::Core(core) | AppError::Pipeline(PipelineError::Core(core)) => Some(core),
            _ => None,
        }
    }
}

fn internal(err: &dyn std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %err, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::PaymentRequired { .. } => (
            StatusCode::PAYMENT_REQUIRED,
            "PAYMENT_REQUIRED",
            core.to_string(),
        ),
        CoreError::Internal(msg) => internal(msg),
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            internal(db_err)
        }
        other => internal(other),
    }
}
