use axum::routing::post;
use axum::Router;

use crate::handlers::social;
use crate::state::AppState;

/// Routes mounted at `/admin`.
pub fn router() -> Router<AppState> {
    Router::new().route("/social/auto-post/run", post(social::run_auto_post))
}
