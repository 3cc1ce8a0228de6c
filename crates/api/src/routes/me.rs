use axum::routing::get;
use axum::Router;

use crate::handlers::usage;
use crate::state::AppState;

/// Routes mounted at `/me`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/usage", get(usage::get_usage))
        .route("/generations", get(usage::list_generations))
}
