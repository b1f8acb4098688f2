// Records consumed from the fantasy data source.
//
// Field names follow the upstream JSON. Everything the upstream may omit or
// send as `null` is optional here so that one odd catalog entry cannot fail
// a whole run.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub type PlayerId = String;
pub type LeagueId = String;
pub type UserId = String;

/// Tag the upstream uses for team defense/special-teams units.
pub const DEFENSE_TAG: &str = "DEF";

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sport {
    #[default]
    Nfl,
}

impl Sport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Nfl => "nfl",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// A player's roster status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RosterStatus {
    Active,
    Inactive,
    InjuredReserve,
    PhysicallyUnableToPerform,
    PracticeSquad,
    NonFootballInjury,
    /// Any value outside the documented set, kept verbatim.
    Other(String),
}

impl RosterStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RosterStatus::Active => "Active",
            RosterStatus::Inactive => "Inactive",
            RosterStatus::InjuredReserve => "Injured Reserve",
            RosterStatus::PhysicallyUnableToPerform => "Physically Unable to Perform",
            RosterStatus::PracticeSquad => "Practice Squad",
            RosterStatus::NonFootballInjury => "Non Football Injury",
            RosterStatus::Other(s) => s,
        }
    }
}

impl From<String> for RosterStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Active" => RosterStatus::Active,
            "Inactive" => RosterStatus::Inactive,
            "Injured Reserve" => RosterStatus::InjuredReserve,
            "Physically Unable to Perform" => RosterStatus::PhysicallyUnableToPerform,
            "Practice Squad" => RosterStatus::PracticeSquad,
            "Non Football Injury" => RosterStatus::NonFootballInjury,
            _ => RosterStatus::Other(s),
        }
    }
}

impl From<RosterStatus> for String {
    fn from(status: RosterStatus) -> Self {
        match status {
            RosterStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RosterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player's injury designation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InjuryStatus {
    InjuredReserve,
    Questionable,
    Suspended,
    NotAvailable,
    Out,
    PhysicallyUnableToPerform,
    DidNotReport,
    Covid,
    Other(String),
}

impl InjuryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InjuryStatus::InjuredReserve => "IR",
            InjuryStatus::Questionable => "Questionable",
            InjuryStatus::Suspended => "Sus",
            InjuryStatus::NotAvailable => "NA",
            InjuryStatus::Out => "OUT",
            InjuryStatus::PhysicallyUnableToPerform => "PUP",
            InjuryStatus::DidNotReport => "DNR",
            InjuryStatus::Covid => "Cov",
            InjuryStatus::Other(s) => s,
        }
    }
}

impl From<String> for InjuryStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "IR" => InjuryStatus::InjuredReserve,
            "Questionable" => InjuryStatus::Questionable,
            "Sus" => InjuryStatus::Suspended,
            "NA" => InjuryStatus::NotAvailable,
            "OUT" | "Out" => InjuryStatus::Out,
            "PUP" => InjuryStatus::PhysicallyUnableToPerform,
            "DNR" => InjuryStatus::DidNotReport,
            "Cov" => InjuryStatus::Covid,
            _ => InjuryStatus::Other(s),
        }
    }
}

impl From<InjuryStatus> for String {
    fn from(status: InjuryStatus) -> Self {
        match status {
            InjuryStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for InjuryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One entry of the player catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub status: Option<RosterStatus>,
    #[serde(default)]
    pub injury_status: Option<InjuryStatus>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fantasy_positions: Vec<String>,
    /// NFL team abbreviation; `None` for free agents.
    #[serde(default)]
    pub team: Option<String>,
}

impl Player {
    /// "First Last", skipping whichever half is missing.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_defense(&self) -> bool {
        self.fantasy_positions.iter().any(|p| p == DEFENSE_TAG)
    }
}

// ---------------------------------------------------------------------------
// League records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub roster_id: u32,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    /// Positional starter ids. The upstream uses `"0"` for an unfilled slot.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub starters: Vec<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub metadata: Option<UserMetadata>,
}

impl User {
    pub fn team_name(&self) -> Option<&str> {
        self.metadata.as_ref()?.team_name.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: LeagueId,
    pub name: String,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub total_rosters: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub roster_positions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Season state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    Pre,
    Regular,
    Post,
    Off,
}

/// Highest week number the upstream reports, postseason included.
pub const MAX_WEEK: u8 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportState {
    pub season: String,
    pub season_type: SeasonType,
    #[serde(default)]
    pub week: Option<u8>,
    #[serde(default)]
    pub display_week: Option<u8>,
    #[serde(default)]
    pub season_start_date: Option<String>,
}

impl SportState {
    /// The current week, if the league is inside one. Week 0 means "between weeks".
    pub fn current_week(&self) -> Option<u8> {
        self.week.filter(|w| (1..=MAX_WEEK).contains(w))
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
