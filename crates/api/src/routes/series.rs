use axum::routing::{get, post};
use axum::Router;

use crate::handlers::series;
use crate::state::AppState;

/// Routes mounted at `/series`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/publish", post(series::publish_series))
        .route("/{series_id}", get(series::get_series))
}
