//! Liveness endpoint, mounted outside `/api/v1`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// `ok` while Postgres answers, `degraded` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    Degraded,
}

/// Body of `GET /health`. The endpoint answers 200 either way so load
/// balancers can tell a slow database from a dead process.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl Health {
    fn from_db_check(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy {
                ServiceStatus::Ok
            } else {
                ServiceStatus::Degraded
            },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let result = colorbook_db::health_check(&state.pool).await;
    if let Err(e) = &result {
        tracing::warn!(error = %e, "Database health check failed");
    }
    Json(Health::from_db_check(result.is_ok()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
