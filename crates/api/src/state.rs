use std::sync::Arc;

use colorbook_pipeline::Generator;
use colorbook_social::AutoPoster;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: colorbook_db::DbPool,
    /// Server configuration (read by the auth extractors).
    pub config: Arc<ServerConfig>,
    /// Series and page generation pipeline.
    pub generator: Arc<Generator>,
    /// Social auto-poster, for on-demand passes.
    pub auto_poster: Arc<AutoPoster>,
}
