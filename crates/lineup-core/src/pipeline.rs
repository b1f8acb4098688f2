// One lineup check: fetch league state, evaluate starters, render alerts,
// and (optionally) post them.

use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::classify::{classify_with, ByeSchedule, NoByeSchedule, TeamFindings};
use crate::directory::DirectoryCache;
use crate::error::{FetchError, FetchFailure, PipelineError};
use crate::format::{format, summarize, Alert, Counts};
use crate::join::join;
use crate::model::{SeasonType, Sport};
use crate::source::{FantasyDataSource, MessageSink};

/// Result of evaluating a league's starting lineups.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub season_type: SeasonType,
    pub week: Option<u8>,
    pub teams: Vec<TeamFindings>,
    pub alerts: Vec<Alert>,
    pub counts: Counts,
}

pub async fn evaluate(
    source: &dyn FantasyDataSource,
    cache: &DirectoryCache,
    league_id: &str,
) -> Result<Evaluation, PipelineError> {
    evaluate_with(source, cache, league_id, &NoByeSchedule).await
}

/// Fetch everything the check needs, in order, stopping at the first failure.
pub async fn evaluate_with(
    source: &dyn FantasyDataSource,
    cache: &DirectoryCache,
    league_id: &str,
    schedule: &dyn ByeSchedule,
) -> Result<Evaluation, PipelineError> {
    let sport = Sport::Nfl;

    let state = source
        .sport_state(sport)
        .await
        .map_err(|f| FetchError::for_id("sport state", sport.as_str(), f))?;
    info!(season = %state.season, week = ?state.current_week(), "fetched sport state");

    let rosters = source
        .rosters(league_id)
        .await
        .map_err(|f| FetchError::for_id("rosters", league_id, f))?;

    let users = source
        .users(league_id)
        .await
        .map_err(|f| FetchError::for_id("users", league_id, f))?;
    info!(
        league_id,
        rosters = rosters.len(),
        users = users.len(),
        "fetched league"
    );

    let directory = cache.get(source, sport).await?;

    let teams = join(&rosters, &users, &directory)?;
    let findings = classify_with(&teams, &state, schedule);
    let alerts = findings.iter().flat_map(format).collect();
    let counts = summarize(&findings);

    Ok(Evaluation {
        season_type: state.season_type,
        week: state.current_week(),
        teams: findings,
        alerts,
        counts,
    })
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// An alert the sink did not accept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedAlert {
    pub text: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: Vec<FailedAlert>,
}

/// Post every alert, at most `max_in_flight` at a time. A rejected alert is
/// logged and recorded; the rest are still sent.
pub async fn dispatch(
    sink: &dyn MessageSink,
    alerts: &[Alert],
    max_in_flight: usize,
) -> DispatchReport {
    // Map over indices: a closure taking `&Alert` makes this future non-Send
    // inside spawned tasks and axum handlers.
    let outcomes: Vec<(usize, Result<bool, FetchFailure>)> = stream::iter(0..alerts.len())
        .map(move |i| async move { (i, sink.post(&alerts[i].text).await) })
        .buffer_unordered(max_in_flight.max(1))
        .collect()
        .await;

    let mut report = DispatchReport::default();
    for (i, outcome) in outcomes {
        let alert = &alerts[i];
        let reason = match outcome {
            Ok(true) => {
                report.sent += 1;
                continue;
            }
            Ok(false) => "rejected by provider".to_string(),
            Err(failure) => failure.to_string(),
        };
        warn!(text = %alert.text, %reason, "alert was not delivered");
        report.failed.push(FailedAlert {
            text: alert.text.clone(),
            reason,
        });
    }

    info!(sent = report.sent, failed = report.failed.len(), "dispatch finished");
    report
}
