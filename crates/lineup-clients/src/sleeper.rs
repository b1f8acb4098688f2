// Sleeper fantasy API client (read-only, unauthenticated GETs).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use lineup_core::error::FetchFailure;
use lineup_core::model::{League, Roster, Sport, SportState, User};
use lineup_core::source::FantasyDataSource;

use crate::USER_AGENT;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SLEEPER_API_URL: &str = "https://api.sleeper.app/v1";

// ---------------------------------------------------------------------------
// SleeperClient
// ---------------------------------------------------------------------------

pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for SleeperClient {
    fn default() -> Self {
        Self::new(SLEEPER_API_URL)
    }
}

impl SleeperClient {
    /// Create a client against `base_url` (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_http(http, base_url)
    }

    /// Use an already configured HTTP client (shared pool, custom proxy).
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchFailure> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        check_status(response.status())?;

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;
        decode_body(&body)
    }
}

#[async_trait]
impl FantasyDataSource for SleeperClient {
    async fn sport_state(&self, sport: Sport) -> Result<SportState, FetchFailure> {
        self.get(&format!("/state/{sport}")).await
    }

    async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>, FetchFailure> {
        self.get(&format!("/league/{league_id}/rosters")).await
    }

    async fn users(&self, league_id: &str) -> Result<Vec<User>, FetchFailure> {
        self.get(&format!("/league/{league_id}/users")).await
    }

    async fn all_players(&self, sport: Sport) -> Result<Value, FetchFailure> {
        self.get(&format!("/players/{sport}")).await
    }

    async fn league(&self, league_id: &str) -> Result<League, FetchFailure> {
        self.get(&format!("/league/{league_id}")).await
    }

    async fn user(&self, user_id: &str) -> Result<User, FetchFailure> {
        self.get(&format!("/user/{user_id}")).await
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub(crate) fn check_status(status: StatusCode) -> Result<(), FetchFailure> {
    if status == StatusCode::NOT_FOUND {
        Err(FetchFailure::NotFound)
    } else if !status.is_success() {
        Err(FetchFailure::Status(status.as_u16()))
    } else {
        Ok(())
    }
}

/// Decode a JSON body. Sleeper answers `null` with a 200 for unknown ids.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchFailure> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| FetchFailure::Decode(e.to_string()))?;
    if value.is_null() {
        return Err(FetchFailure::NotFound);
    }
    serde_json::from_value(value).map_err(|e| FetchFailure::Decode(e.to_string()))
}
