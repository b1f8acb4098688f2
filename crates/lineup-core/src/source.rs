// Collaborators the pipeline talks to. HTTP implementations live in
// `lineup-clients`; tests substitute in-memory ones.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchFailure;
use crate::model::{League, Roster, Sport, SportState, User};

/// Read-only fantasy data provider.
#[async_trait]
pub trait FantasyDataSource: Send + Sync {
    async fn sport_state(&self, sport: Sport) -> Result<SportState, FetchFailure>;

    async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>, FetchFailure>;

    async fn users(&self, league_id: &str) -> Result<Vec<User>, FetchFailure>;

    /// The full player catalog as raw JSON, so it can be persisted verbatim.
    async fn all_players(&self, sport: Sport) -> Result<Value, FetchFailure>;

    async fn league(&self, league_id: &str) -> Result<League, FetchFailure>;

    async fn user(&self, user_id: &str) -> Result<User, FetchFailure>;
}

/// Write-only chat channel.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Post one message. `Ok(true)` iff the provider accepted it.
    async fn post(&self, text: &str) -> Result<bool, FetchFailure>;
}
