// Configuration loading: optional TOML file, overridden by command-line
// flags / environment, validated once at startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use lineup_clients::groupme::GROUPME_API_URL;
use lineup_clients::sleeper::SLEEPER_API_URL;
use lineup_core::directory::DEFAULT_CACHE_PATH;

/// Looked up relative to the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/lineup-watch.toml";

const DEFAULT_INTERVAL_MINUTES: u64 = 60;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_IN_FLIGHT: usize = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("no {field} was given; {hint}")]
    MissingField { field: &'static str, hint: &'static str },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub league_id: String,
    pub bot_id: String,
    pub user_id: Option<String>,
    pub cache_path: PathBuf,
    pub interval_minutes: u64,
    pub server: ServerConfig,
    pub max_in_flight: usize,
    pub sleeper_base_url: String,
    pub groupme_base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Values supplied on the command line (or via their environment variables).
/// Each one wins over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub league_id: Option<String>,
    pub bot_id: Option<String>,
    pub user_id: Option<String>,
    pub interval_minutes: Option<u64>,
    pub port: Option<u16>,
}

// ---------------------------------------------------------------------------
// lineup-watch.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    league: LeagueSection,
    cache: CacheSection,
    schedule: ScheduleSection,
    server: ServerSection,
    dispatch: DispatchSection,
    sleeper: EndpointSection,
    groupme: EndpointSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LeagueSection {
    league_id: Option<String>,
    bot_id: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CacheSection {
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ScheduleSection {
    interval_minutes: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct DispatchSection {
    max_in_flight: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct EndpointSection {
    base_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load configuration.
///
/// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
/// read if present and built-in defaults are used otherwise.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config, ConfigError> {
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    let path = match path {
        Some(path) => path,
        None if default_path.exists() => default_path,
        None => return finish(ConfigFile::default(), overrides),
    };

    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    config_from_str(&text, path, overrides)
}

/// Parse a config from TOML text, applying overrides. Used by tests and by
/// [`load_config`] after reading the file.
pub fn config_from_str(
    text: &str,
    path: &Path,
    overrides: &Overrides,
) -> Result<Config, ConfigError> {
    finish(parse(text, path)?, overrides)
}

fn finish(file: ConfigFile, overrides: &Overrides) -> Result<Config, ConfigError> {
    let config = assemble(file, overrides)?;
    validate(&config)?;
    Ok(config)
}

fn parse(text: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

fn assemble(file: ConfigFile, overrides: &Overrides) -> Result<Config, ConfigError> {
    let league_id = overrides
        .league_id
        .clone()
        .or(file.league.league_id)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::MissingField {
            field: "league ID",
            hint: "pass --league-id <your league ID> or set [league] league_id",
        })?;

    let bot_id = overrides
        .bot_id
        .clone()
        .or(file.league.bot_id)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::MissingField {
            field: "bot ID",
            hint: "pass --bot-id <your bot ID> or set [league] bot_id",
        })?;

    let user_id = overrides
        .user_id
        .clone()
        .or(file.league.user_id)
        .filter(|s| !s.trim().is_empty());

    Ok(Config {
        league_id,
        bot_id,
        user_id,
        cache_path: file
            .cache
            .path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH)),
        interval_minutes: overrides
            .interval_minutes
            .or(file.schedule.interval_minutes)
            .unwrap_or(DEFAULT_INTERVAL_MINUTES),
        server: ServerConfig {
            host: file.server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides
                .port
                .or(file.server.port)
                .unwrap_or(DEFAULT_PORT),
        },
        max_in_flight: file.dispatch.max_in_flight.unwrap_or(DEFAULT_MAX_IN_FLIGHT),
        sleeper_base_url: file
            .sleeper
            .base_url
            .unwrap_or_else(|| SLEEPER_API_URL.to_string()),
        groupme_base_url: file
            .groupme
            .base_url
            .unwrap_or_else(|| GROUPME_API_URL.to_string()),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.interval_minutes == 0 {
        return Err(ConfigError::ValidationError {
            field: "schedule.interval_minutes".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError {
            field: "server.port".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.max_in_flight == 0 {
        return Err(ConfigError::ValidationError {
            field: "dispatch.max_in_flight".into(),
            message: "must be greater than 0".into(),
        });
    }

    for (field, url) in [
        ("sleeper.base_url", &config.sleeper_base_url),
        ("groupme.base_url", &config.groupme_base_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                field: field.into(),
                message: format!("must be an http(s) URL, got {url:?}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
