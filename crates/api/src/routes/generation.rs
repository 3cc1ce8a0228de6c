use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Routes mounted at `/generate`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/series", post(generation::generate_series))
        .route("/page", post(generation::generate_page))
}
