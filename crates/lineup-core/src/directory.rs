// Player catalog and its on-disk snapshot.
//
// The catalog is several megabytes, so the first successful fetch is written
// to disk and every later run reads the file instead. There is no expiry:
// delete the file to force a refetch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{CacheError, FetchError, PipelineError};
use crate::model::{Player, PlayerId, Sport};
use crate::source::FantasyDataSource;

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "data/all-players.json";

// ---------------------------------------------------------------------------
// PlayerDirectory
// ---------------------------------------------------------------------------

/// Player id -> player record. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerDirectory {
    players: HashMap<PlayerId, Player>,
}

impl PlayerDirectory {
    /// Parse a raw catalog in place, without copying the JSON tree.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl FromIterator<Player> for PlayerDirectory {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self {
            players: iter
                .into_iter()
                .map(|p| (p.player_id.clone(), p))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// DirectoryCache
// ---------------------------------------------------------------------------

/// File-backed cache in front of the upstream player catalog.
///
/// Not safe for concurrent cold starts; callers serialize runs.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    path: PathBuf,
}

impl Default for DirectoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_PATH)
    }
}

impl DirectoryCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot is already on disk.
    pub async fn is_warm(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Load the snapshot, or fetch the catalog and write it if none exists.
    pub async fn get(
        &self,
        source: &dyn FantasyDataSource,
        sport: Sport,
    ) -> Result<PlayerDirectory, PipelineError> {
        if self.is_warm().await {
            let directory = self.read().await?;
            debug!(
                path = %self.path.display(),
                players = directory.len(),
                "player cache hit"
            );
            return Ok(directory);
        }

        info!(path = %self.path.display(), %sport, "player cache cold, fetching catalog");
        let raw = source
            .all_players(sport)
            .await
            .map_err(|failure| FetchError::new("all players", failure))?;

        let directory =
            PlayerDirectory::from_value(&raw).map_err(CacheError::InvalidCatalog)?;
        self.write(&raw).await?;
        info!(
            path = %self.path.display(),
            players = directory.len(),
            "player catalog cached"
        );
        Ok(directory)
    }

    async fn read(&self) -> Result<PlayerDirectory, CacheError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| CacheError::Read {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| CacheError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, raw: &Value) -> Result<(), CacheError> {
        let write_err = |source| CacheError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let pretty = serde_json::to_vec_pretty(raw).map_err(|e| write_err(e.into()))?;
        tokio::fs::write(&self.path, pretty).await.map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchFailure;
    use crate::memory::MemorySource;
    use serde_json::json;

    fn catalog() -> Value {
        json!({
            "4046": {
                "player_id": "4046",
                "first_name": "Patrick",
                "last_name": "Mahomes",
                "status": "Active",
                "injury_status": null,
                "fantasy_positions": ["QB"],
                "team": "KC",
                "search_rank": 12
            },
            "KC": {
                "player_id": "KC",
                "first_name": "Kansas City",
                "last_name": "Chiefs",
                "fantasy_positions": ["DEF"],
                "team": "KC"
            }
        })
    }

    /// Unique scratch directory per test; removed before use.
    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lineup_core_cache_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn cold_fetch_writes_pretty_snapshot() {
        let dir = scratch("cold");
        let cache = DirectoryCache::new(dir.join("data/all-players.json"));
        let source = MemorySource::default().with_players(catalog());

        assert!(!cache.is_warm().await);
        let directory = cache.get(&source, Sport::Nfl).await.unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(source.player_fetches(), 1);

        let written = std::fs::read_to_string(cache.path()).unwrap();
        assert!(written.contains("\n  \"4046\": {"), "snapshot should be pretty-printed");
        // Fields the model ignores are still persisted.
        assert!(written.contains("search_rank"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn snapshot_round_trips() {
        let dir = scratch("round_trip");
        let cache = DirectoryCache::new(dir.join("all-players.json"));
        let source = MemorySource::default().with_players(catalog());

        let fetched = cache.get(&source, Sport::Nfl).await.unwrap();
        let reread = cache.get(&source, Sport::Nfl).await.unwrap();
        assert_eq!(fetched, reread);
        assert_eq!(
            reread.get("4046").and_then(|p| p.team.as_deref()),
            Some("KC")
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn warm_cache_skips_network() {
        let dir = scratch("warm");
        let cache = DirectoryCache::new(dir.join("all-players.json"));
        let source = MemorySource::default().with_players(catalog());

        cache.get(&source, Sport::Nfl).await.unwrap();
        cache.get(&source, Sport::Nfl).await.unwrap();
        cache.get(&source, Sport::Nfl).await.unwrap();
        assert_eq!(source.player_fetches(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn upstream_failure_names_resource_and_writes_nothing() {
        let dir = scratch("upstream_failure");
        let cache = DirectoryCache::new(dir.join("all-players.json"));
        let source = MemorySource::default();

        let err = cache.get(&source, Sport::Nfl).await.unwrap_err();
        match err {
            PipelineError::Fetch(FetchError {
                resource, failure, ..
            }) => {
                assert_eq!(resource, "all players");
                assert_eq!(failure, FetchFailure::NotFound);
            }
            other => panic!("expected fetch error, got: {other}"),
        }
        assert!(!cache.is_warm().await);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_fatal_and_left_alone() {
        let dir = scratch("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("all-players.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cache = DirectoryCache::new(&path);
        let source = MemorySource::default().with_players(catalog());
        let err = cache.get(&source, Sport::Nfl).await.unwrap_err();
        assert!(matches!(err, PipelineError::Cache(CacheError::Corrupt { .. })));
        assert_eq!(source.player_fetches(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_from_players() {
        let directory: PlayerDirectory = PlayerDirectory::from_value(&catalog()).unwrap();
        assert!(directory.get("KC").unwrap().is_defense());
        assert!(directory.get("0").is_none());
        assert!(!directory.is_empty());
    }

    #[test]
    fn parsing_borrows_the_raw_catalog() {
        let raw = catalog();
        let directory = PlayerDirectory::from_value(&raw).unwrap();
        assert_eq!(Some(directory.len()), raw.as_object().map(|o| o.len()));
        assert_eq!(raw, catalog());
    }
}
