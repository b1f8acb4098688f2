// Periodic checks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::runner::{CheckMode, Runner, RunnerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Completed { alerts: usize },
    Skipped,
    Failed,
}

/// Run one scheduled check. Errors are logged, never propagated.
pub async fn run_tick(runner: &Runner) -> TickOutcome {
    match runner.check(CheckMode::Send).await {
        Ok(report) => TickOutcome::Completed {
            alerts: report.alerts.len(),
        },
        Err(RunnerError::Busy { league_id }) => {
            warn!(%league_id, "previous check still running, skipping this tick");
            TickOutcome::Skipped
        }
        Err(e) => {
            error!("scheduled check failed: {e}");
            TickOutcome::Failed
        }
    }
}

/// Check immediately, then every `every`, until `shutdown` resolves.
pub async fn watch<F>(runner: Arc<Runner>, every: Duration, shutdown: F)
where
    F: Future<Output = ()>,
{
    info!(
        league_id = runner.league_id(),
        every_secs = every.as_secs(),
        "scheduled checks started"
    );

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    // The first tick completes at once; consume it so the initial check
    // cannot lose the race against an already-resolved shutdown.
    interval.tick().await;
    run_tick(&runner).await;

    loop {
        tokio::select! {
            biased;
            _ = interval.tick() => {
                run_tick(&runner).await;
            }
            _ = &mut shutdown => {
                info!("scheduled checks stopped");
                break;
            }
        }
    }
}
