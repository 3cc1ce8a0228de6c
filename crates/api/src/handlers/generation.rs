//! Handlers for series and single-page generation.
//!
//! Routes:
//! - `POST /generate/series` -- generate a story series
//! - `POST /generate/page`   -- generate one standalone page
//!
//! Both accept the service key, an admin JWT (unmetered) or a user JWT
//! (metered against quota or credits).

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use colorbook_pipeline::{PageRequest, PageResult, SeriesRequest, SeriesResult};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::Principal;
use crate::state::AppState;

/// Successful series response.
#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: SeriesResult,
    /// Every requested scene produced an image.
    pub complete: bool,
}

/// Successful page response.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: PageResult,
}

/// POST /api/v1/generate/series
pub async fn generate_series(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(input): ApiJson<SeriesRequest>,
) -> AppResult<Json<SeriesResponse>> {
    let result = state
        .generator
        .generate_series(principal.caller(), &input)
        .await?;

    Ok(Json(SeriesResponse {
        success: true,
        complete: result.is_complete(),
        result,
    }))
}

/// POST /api/v1/generate/page
pub async fn generate_page(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(input): ApiJson<PageRequest>,
) -> AppResult<Json<PageResponse>> {
    let result = state
        .generator
        .generate_page(principal.caller(), &input)
        .await?;

    Ok(Json(PageResponse {
        success: true,
        result,
    }))
}
