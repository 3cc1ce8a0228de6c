//! Admin trigger for the social auto-poster.

use axum::extract::State;
use axum::Json;
use colorbook_social::AutoPostSummary;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/social/auto-post/run
///
/// Runs one auto-post pass synchronously and reports its counters.
pub async fn run_auto_post(
    RequireAdmin(_principal): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AutoPostSummary>>> {
    let summary = state.auto_poster.run_once(chrono::Utc::now()).await?;
    Ok(Json(DataResponse { data: summary }))
}
