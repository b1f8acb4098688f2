// In-memory collaborators for tests. Built with `cfg(test)` or the
// `test-support` feature.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchFailure;
use crate::model::{League, Roster, Sport, SportState, User};
use crate::source::{FantasyDataSource, MessageSink};

/// Fixed fantasy data. Any record left unset answers `NotFound`.
#[derive(Debug, Default)]
pub struct MemorySource {
    state: Option<SportState>,
    rosters: Option<Vec<Roster>>,
    users: Option<Vec<User>>,
    players: Option<Value>,
    league: Option<League>,
    user: Option<User>,
    player_fetches: AtomicUsize,
    calls: AtomicUsize,
}

impl MemorySource {
    pub fn with_state(mut self, state: SportState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_rosters(mut self, rosters: Vec<Roster>) -> Self {
        self.rosters = Some(rosters);
        self
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_players(mut self, players: Value) -> Self {
        self.players = Some(players);
        self
    }

    pub fn with_league(mut self, league: League) -> Self {
        self.league = Some(league);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// How many times the player catalog was requested.
    pub fn player_fetches(&self) -> usize {
        self.player_fetches.load(Ordering::SeqCst)
    }

    /// Total number of requests of any kind.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer<T: Clone>(&self, value: &Option<T>) -> Result<T, FetchFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        value.clone().ok_or(FetchFailure::NotFound)
    }
}

#[async_trait]
impl FantasyDataSource for MemorySource {
    async fn sport_state(&self, _sport: Sport) -> Result<SportState, FetchFailure> {
        self.answer(&self.state)
    }

    async fn rosters(&self, _league_id: &str) -> Result<Vec<Roster>, FetchFailure> {
        self.answer(&self.rosters)
    }

    async fn users(&self, _league_id: &str) -> Result<Vec<User>, FetchFailure> {
        self.answer(&self.users)
    }

    async fn all_players(&self, _sport: Sport) -> Result<Value, FetchFailure> {
        self.player_fetches.fetch_add(1, Ordering::SeqCst);
        self.answer(&self.players)
    }

    async fn league(&self, _league_id: &str) -> Result<League, FetchFailure> {
        self.answer(&self.league)
    }

    async fn user(&self, _user_id: &str) -> Result<User, FetchFailure> {
        self.answer(&self.user)
    }
}

/// Records every posted message. Messages containing any of the
/// `reject` fragments are answered with `Ok(false)`.
#[derive(Debug, Default)]
pub struct MemorySink {
    posted: Mutex<Vec<String>>,
    reject: Vec<String>,
}

impl MemorySink {
    pub fn rejecting(fragments: &[&str]) -> Self {
        Self {
            posted: Mutex::new(Vec::new()),
            reject: fragments.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Messages the sink accepted, in arrival order.
    pub fn posted(&self) -> Vec<String> {
        self.posted.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl MessageSink for MemorySink {
    async fn post(&self, text: &str) -> Result<bool, FetchFailure> {
        if self.reject.iter().any(|r| text.contains(r.as_str())) {
            return Ok(false);
        }
        self.posted
            .lock()
            .expect("sink lock poisoned")
            .push(text.to_string());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn sink_records_accepted_and_skips_rejected() {
        let sink = MemorySink::rejecting(&["DEF"]);
        assert_eq!(sink.post("at QB").await, Ok(true));
        assert_eq!(sink.post("at DEF").await, Ok(false));
        assert_eq!(sink.posted(), vec!["at QB"]);
    }

    #[test]
    #[should_panic(expected = "sink lock poisoned")]
    fn poisoned_sink_panics_instead_of_losing_messages() {
        let sink = Arc::new(MemorySink::default());
        let holder = sink.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.posted.lock().unwrap();
            panic!("writer died");
        })
        .join();

        sink.posted();
    }

    #[tokio::test]
    async fn unset_records_are_not_found() {
        let source = MemorySource::default();
        assert_eq!(source.rosters("1").await, Err(FetchFailure::NotFound));
        assert_eq!(source.all_players(Sport::Nfl).await, Err(FetchFailure::NotFound));
        assert_eq!(source.calls(), 2);
        assert_eq!(source.player_fetches(), 1);
    }
}
