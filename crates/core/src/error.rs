use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(
        "Insufficient quota or credits. Required: {required}, \
         available quota: {available_quota}, available credits: {available_credits}"
    )]
    PaymentRequired {
        required: i32,
        available_quota: i32,
        available_credits: i32,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
