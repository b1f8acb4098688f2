// Runs lineup checks for one league, one at a time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use lineup_clients::{GroupMeClient, SleeperClient};
use lineup_core::classify::TeamFindings;
use lineup_core::directory::DirectoryCache;
use lineup_core::error::PipelineError;
use lineup_core::format::{Alert, Counts};
use lineup_core::model::SeasonType;
use lineup_core::pipeline::{dispatch, evaluate, DispatchReport};
use lineup_core::position::layout_matches_league;
use lineup_core::source::{FantasyDataSource, MessageSink};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Evaluate only; nothing is posted.
    DryRun,
    Send,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("a check for league {league_id} is already running")]
    Busy { league_id: String },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub league_id: String,
    pub checked_at: DateTime<Utc>,
    pub season_type: SeasonType,
    pub week: Option<u8>,
    pub counts: Counts,
    pub teams: Vec<TeamFindings>,
    pub alerts: Vec<Alert>,
    /// Present only for [`CheckMode::Send`].
    pub dispatch: Option<DispatchReport>,
}

pub struct Runner {
    league_id: String,
    max_in_flight: usize,
    source: Arc<dyn FantasyDataSource>,
    sink: Arc<dyn MessageSink>,
    cache: DirectoryCache,
    // Held for the whole check; also keeps cold-cache writes single-writer.
    in_flight: Mutex<()>,
}

impl Runner {
    pub fn new(
        config: &Config,
        source: Arc<dyn FantasyDataSource>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            league_id: config.league_id.clone(),
            max_in_flight: config.max_in_flight,
            source,
            sink,
            cache: DirectoryCache::new(&config.cache_path),
            in_flight: Mutex::new(()),
        }
    }

    /// Runner wired to the real Sleeper and GroupMe endpoints.
    pub fn from_config(config: &Config) -> Self {
        let source = SleeperClient::new(config.sleeper_base_url.clone());
        let sink = GroupMeClient::with_base_url(config.bot_id.clone(), &config.groupme_base_url);
        Self::new(config, Arc::new(source), Arc::new(sink))
    }

    pub fn league_id(&self) -> &str {
        &self.league_id
    }

    /// Evaluate the league and, in send mode, post every alert.
    ///
    /// Returns [`RunnerError::Busy`] instead of waiting when another check
    /// is in progress.
    pub async fn check(&self, mode: CheckMode) -> Result<CheckReport, RunnerError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| RunnerError::Busy {
                league_id: self.league_id.clone(),
            })?;

        let checked_at = Utc::now();
        info!(league_id = %self.league_id, ?mode, "starting lineup check");

        let evaluation = evaluate(self.source.as_ref(), &self.cache, &self.league_id).await?;

        let dispatch = match mode {
            CheckMode::DryRun => None,
            CheckMode::Send => Some(
                dispatch(
                    self.sink.as_ref(),
                    &evaluation.alerts,
                    self.max_in_flight,
                )
                .await,
            ),
        };

        info!(
            league_id = %self.league_id,
            counts = %evaluation.counts,
            sent = dispatch.as_ref().map(|d| d.sent),
            failed = dispatch.as_ref().map(|d| d.failed.len()),
            "lineup check complete"
        );

        Ok(CheckReport {
            league_id: self.league_id.clone(),
            checked_at,
            season_type: evaluation.season_type,
            week: evaluation.week,
            counts: evaluation.counts,
            teams: evaluation.teams,
            alerts: evaluation.alerts,
            dispatch,
        })
    }

    /// Startup diagnostics. Never fails; problems are logged as warnings.
    pub async fn preflight(&self, user_id: Option<&str>) {
        if let Some(user_id) = user_id {
            match self.source.user(user_id).await {
                Ok(user) => info!(user_id, name = %user.display_name, "running as user"),
                Err(failure) => warn!(user_id, %failure, "could not look up user"),
            }
        }

        match self.source.league(&self.league_id).await {
            Ok(league) if layout_matches_league(&league) => {
                info!(league_id = %self.league_id, name = %league.name, "league found");
            }
            Ok(league) => warn!(
                league_id = %self.league_id,
                name = %league.name,
                positions = ?league.roster_positions,
                "league lineup differs from QB/RB/RB/WR/WR/WR/TE/FLEX/FLEX/K/DEF; checks may fail or mislabel slots"
            ),
            Err(failure) => warn!(league_id = %self.league_id, %failure, "could not look up league"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use async_trait::async_trait;
    use lineup_core::error::FetchFailure;
    use lineup_core::memory::{MemorySink, MemorySource};
    use lineup_core::model::{League, Roster, Sport, SportState, User, UserMetadata};
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use tokio::sync::Notify;

    fn config(cache_path: PathBuf) -> Config {
        Config {
            league_id: "league-1".into(),
            bot_id: "bot".into(),
            user_id: None,
            cache_path,
            interval_minutes: 60,
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
            },
            max_in_flight: 1,
            sleeper_base_url: "http://localhost".into(),
            groupme_base_url: "http://localhost".into(),
        }
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lineup_app_runner_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn league_source() -> MemorySource {
        MemorySource::default()
            .with_state(SportState {
                season: "2024".into(),
                season_type: SeasonType::Regular,
                week: Some(3),
                display_week: Some(3),
                season_start_date: None,
            })
            .with_rosters(vec![Roster {
                roster_id: 1,
                owner_id: Some("u1".into()),
                starters: vec!["p1".into(), "0".into()],
            }])
            .with_users(vec![User {
                user_id: "u1".into(),
                display_name: "alice".into(),
                metadata: Some(UserMetadata {
                    team_name: Some("Alice FC".into()),
                }),
            }])
            .with_players(json!({
                "p1": { "player_id": "p1", "first_name": "Josh", "last_name": "Allen",
                        "status": "Active", "fantasy_positions": ["QB"], "team": "BUF" }
            }))
    }

    #[tokio::test]
    async fn dry_run_posts_nothing() {
        let dir = scratch("dry_run");
        let sink = Arc::new(MemorySink::default());
        let runner = Runner::new(
            &config(dir.join("players.json")),
            Arc::new(league_source()),
            sink.clone(),
        );

        let report = runner.check(CheckMode::DryRun).await.unwrap();
        assert_eq!(report.counts.empty, 1);
        assert_eq!(report.alerts.len(), 1);
        assert!(report.dispatch.is_none());
        assert!(sink.posted().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn send_posts_alerts() {
        let dir = scratch("send");
        let sink = Arc::new(MemorySink::default());
        let runner = Runner::new(
            &config(dir.join("players.json")),
            Arc::new(league_source()),
            sink.clone(),
        );

        let report = runner.check(CheckMode::Send).await.unwrap();
        let dispatch = report.dispatch.unwrap();
        assert_eq!(dispatch.sent, 1);
        assert_eq!(
            sink.posted(),
            vec!["alice (Alice FC) is not starting a player at RB!"]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn fetch_failure_sends_nothing() {
        let dir = scratch("fetch_failure");
        let sink = Arc::new(MemorySink::default());
        let runner = Runner::new(
            &config(dir.join("players.json")),
            Arc::new(MemorySource::default()),
            sink.clone(),
        );

        let err = runner.check(CheckMode::Send).await.unwrap_err();
        assert!(matches!(err, RunnerError::Pipeline(PipelineError::Fetch(_))));
        assert!(sink.posted().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Blocks in `sport_state` until released, so a check can be held open.
    struct GatedSource {
        inner: MemorySource,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl FantasyDataSource for GatedSource {
        async fn sport_state(&self, sport: Sport) -> Result<SportState, FetchFailure> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.sport_state(sport).await
        }
        async fn rosters(&self, id: &str) -> Result<Vec<Roster>, FetchFailure> {
            self.inner.rosters(id).await
        }
        async fn users(&self, id: &str) -> Result<Vec<User>, FetchFailure> {
            self.inner.users(id).await
        }
        async fn all_players(&self, sport: Sport) -> Result<Value, FetchFailure> {
            self.inner.all_players(sport).await
        }
        async fn league(&self, id: &str) -> Result<League, FetchFailure> {
            self.inner.league(id).await
        }
        async fn user(&self, id: &str) -> Result<User, FetchFailure> {
            self.inner.user(id).await
        }
    }

    #[tokio::test]
    async fn overlapping_check_is_busy() {
        let dir = scratch("busy");
        let source = Arc::new(GatedSource {
            inner: league_source(),
            entered: Notify::new(),
            release: Notify::new(),
        });
        let runner = Arc::new(Runner::new(
            &config(dir.join("players.json")),
            source.clone(),
            Arc::new(MemorySink::default()),
        ));

        let first = tokio::spawn({
            let runner = runner.clone();
            async move { runner.check(CheckMode::DryRun).await }
        });
        source.entered.notified().await;

        let second = runner.check(CheckMode::DryRun).await;
        assert!(matches!(second, Err(RunnerError::Busy { ref league_id }) if league_id == "league-1"));

        source.release.notify_one();
        let first = first.await.unwrap();
        assert!(first.is_ok());

        // Guard is released once the first check finishes.
        source.release.notify_one();
        assert!(runner.check(CheckMode::DryRun).await.is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn preflight_tolerates_missing_records() {
        let source = Arc::new(MemorySource::default());
        let runner = Runner::new(
            &config(PathBuf::from("unused.json")),
            source.clone(),
            Arc::new(MemorySink::default()),
        );
        runner.preflight(Some("u1")).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn preflight_checks_league_layout() {
        let source = Arc::new(
            MemorySource::default()
                .with_league(League {
                    league_id: "league-1".into(),
                    name: "Test".into(),
                    season: Some("2024".into()),
                    total_rosters: Some(10),
                    roster_positions: vec!["QB".into(), "BN".into()],
                })
                .with_user(User {
                    user_id: "u1".into(),
                    display_name: "alice".into(),
                    metadata: None,
                }),
        );
        let runner = Runner::new(
            &config(PathBuf::from("unused.json")),
            source.clone(),
            Arc::new(MemorySink::default()),
        );
        runner.preflight(None).await;
        assert_eq!(source.calls(), 1);
    }
}
