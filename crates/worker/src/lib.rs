//! Scheduled auto-poster.
//!
//! Runs one [`AutoPoster::run_once`] pass per tick until cancelled. A pass
//! that fails is logged and the next tick tries again.

use std::sync::Arc;
use std::time::Duration;

use colorbook_social::AutoPoster;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Default time between passes: 1 hour.
pub const DEFAULT_TICK_SECS: u64 = 3600;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Time between auto-post passes.
    pub tick: Duration,
}

impl WorkerConfig {
    /// | Env Var               | Default |
    /// |-----------------------|---------|
    /// | `AUTO_POST_TICK_SECS` | `3600`  |
    pub fn from_env() -> Self {
        Self::from_tick_var(std::env::var("AUTO_POST_TICK_SECS").ok().as_deref())
    }

    fn from_tick_var(value: Option<&str>) -> Self {
        let secs = value
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&s| s > 0)
            .unwrap_or(DEFAULT_TICK_SECS);
        Self {
            tick: Duration::from_secs(secs),
        }
    }
}

/// Run the auto-post loop. The first pass starts immediately.
pub async fn run(poster: Arc<AutoPoster>, config: WorkerConfig, cancel: CancellationToken) {
    tracing::info!(tick_secs = config.tick.as_secs(), "Auto-post worker started");

    let mut interval = tokio::time::interval(config.tick);
    // A slow pass should not be followed by a burst of catch-up passes.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Auto-post worker stopping");
                break;
            }
            _ = interval.tick() => {
                // The pass logs its own summary.
                if let Err(e) = poster.run_once(chrono::Utc::now()).await {
                    tracing::error!(error = %e, "Auto-post pass failed");
                }
            }
        }
    }
}
