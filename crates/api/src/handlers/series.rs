//! Handlers for publishing generated series as coloring pages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;
use colorbook_core::difficulty::Difficulty;
use colorbook_core::error::CoreError;
use colorbook_db::models::coloring_page::{ColoringPage, PublishSeriesRequest};
use colorbook_db::repositories::{CategoryRepo, ColoringPageRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// A series stored as coloring pages.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedSeries {
    pub series_id: Uuid,
    pub pages: Vec<ColoringPage>,
}

/// POST /api/v1/series/publish
///
/// Stores every image as a page of one new series, in a single transaction.
pub async fn publish_series(
    RequireAdmin(_principal): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PublishSeriesRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PublishedSeries>>)> {
    if input.images.is_empty() {
        return Err(CoreError::Validation("images must not be empty".into()).into());
    }
    if input.series_title.trim().is_empty() {
        return Err(CoreError::Validation("seriesTitle must not be empty".into()).into());
    }
    let difficulty = input
        .difficulty
        .as_deref()
        .map(Difficulty::from_name)
        .transpose()?
        .unwrap_or_default();

    CategoryRepo::find_by_id(&state.pool, input.category_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: input.category_id,
        }))?;

    let series_id = Uuid::new_v4();
    let pages = ColoringPageRepo::create_series(
        &state.pool,
        input.category_id,
        difficulty.as_str(),
        series_id,
        &input.pages(),
    )
    .await?;

    tracing::info!(%series_id, pages = pages.len(), "Series published");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PublishedSeries { series_id, pages },
        }),
    ))
}

/// GET /api/v1/series/{series_id}
pub async fn get_series(
    RequireAuth(_principal): RequireAuth,
    State(state): State<AppState>,
    Path(series_id): Path<Uuid>,
) -> AppResult<Json<DataResponse<Vec<ColoringPage>>>> {
    let pages = ColoringPageRepo::list_by_series(&state.pool, series_id).await?;
    if pages.is_empty() {
        return Err(AppError::NotFound(format!("Series {series_id} not found")));
    }
    Ok(Json(DataResponse { data: pages }))
}
