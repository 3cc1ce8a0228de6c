pub mod admin;
pub mod generation;
pub mod health;
pub mod me;
pub mod series;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate/series                 generate a story series (bearer)
/// /generate/page                   generate one page (bearer)
///
/// /series/publish                  store a series as pages (admin)
/// /series/{series_id}              list a stored series (bearer)
///
/// /me/usage                        quota and credit snapshot (user)
/// /me/generations                  generation history (user)
///
/// /admin/social/auto-post/run      one auto-post pass (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/generate", generation::router())
        .nest("/series", series::router())
        .nest("/me", me::router())
        .nest("/admin", admin::router())
}
