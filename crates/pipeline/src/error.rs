use colorbook_core::error::CoreError;

/// Errors that abort a generation request.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Validation or payment errors from the domain layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The story outline could not be produced or parsed.
    #[error("Failed to generate story outline: {0}")]
    Outline(String),

    /// The image model failed for a single-page request.
    #[error("Image generation failed: {0}")]
    Image(String),

    /// Upload failed for a single-page request.
    #[error("Image upload failed: {0}")]
    Storage(String),

    /// Every scene was skipped or failed.
    #[error("No images were generated ({requested} requested)")]
    NoImages { requested: u32 },

    /// The generation task panicked or was cancelled by the runtime.
    #[error("Generation task aborted: {0}")]
    Aborted(String),

    /// The ledger rows disagreed with the reservation being settled.
    #[error("Billing error: {0}")]
    Billing(String),
}
