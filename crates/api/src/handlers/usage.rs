//! Handlers for the caller's own quota, credits and generation history.

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use colorbook_db::models::ai_generation::AiGeneration;
use colorbook_db::repositories::{AiGenerationRepo, LedgerRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Quota and credit snapshot for the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    pub monthly_quota: i32,
    pub used_quota: i32,
    pub quota_remaining: i32,
    pub credit_balance: i32,
    pub total_credits_used: i32,
}

/// GET /api/v1/me/usage
pub async fn get_usage(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UsageResponse>>> {
    let counters = LedgerRepo::read_counters(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: UsageResponse {
            monthly_quota: counters.monthly_quota,
            used_quota: counters.used_quota,
            quota_remaining: counters.snapshot().quota_remaining(),
            credit_balance: counters.credit_balance,
            total_credits_used: counters.total_credits_used,
        },
    }))
}

/// GET /api/v1/me/generations?limit=&offset=
pub async fn list_generations(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<AiGeneration>>>> {
    let rows = AiGenerationRepo::list_for_user(
        &state.pool,
        user.user_id,
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: rows }))
}
