// Starting lineup slot positions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SlotError;
use crate::model::League;

/// Number of starters in the standard lineup.
pub const STANDARD_STARTER_COUNT: usize = 11;

/// Fantasy positions a starter slot can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "FLEX")]
    Flex,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "DEF")]
    Defense,
}

impl Position {
    /// Parse an upstream position abbreviation.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "FLEX" => Some(Position::Flex),
            "K" => Some(Position::Kicker),
            "DEF" => Some(Position::Defense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Flex => "FLEX",
            Position::Kicker => "K",
            Position::Defense => "DEF",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position required at `index` in the standard lineup:
/// QB, RB×2, WR×3, TE, FLEX×2, K, DEF.
pub fn required_position(index: usize) -> Result<Position, SlotError> {
    match index {
        0 => Ok(Position::Quarterback),
        1 | 2 => Ok(Position::RunningBack),
        3..=5 => Ok(Position::WideReceiver),
        6 => Ok(Position::TightEnd),
        7 | 8 => Ok(Position::Flex),
        9 => Ok(Position::Kicker),
        10 => Ok(Position::Defense),
        _ => Err(SlotError::UnknownSlot { index }),
    }
}

/// Maps a starter index to the position it requires.
///
/// Only [`StandardLayout`] exists today. Leagues whose lineup differs from it
/// fail with [`SlotError`] instead of being read from league settings.
pub trait SlotLayout: Send + Sync {
    fn position_at(&self, index: usize) -> Result<Position, SlotError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLayout;

impl SlotLayout for StandardLayout {
    fn position_at(&self, index: usize) -> Result<Position, SlotError> {
        required_position(index)
    }
}

/// Whether the league's starting slots line up with the standard table.
/// Bench, taxi and reserve entries are ignored.
pub fn layout_matches_league(league: &League) -> bool {
    let starters: Vec<&str> = league
        .roster_positions
        .iter()
        .map(String::as_str)
        .filter(|p| !matches!(*p, "BN" | "TAXI" | "IR"))
        .collect();

    starters.len() == STANDARD_STARTER_COUNT
        && starters.iter().enumerate().all(|(i, p)| {
            matches!(
                (Position::from_str_pos(p), required_position(i)),
                (Some(actual), Ok(expected)) if actual == expected
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table() {
        let expected = [
            "QB", "RB", "RB", "WR", "WR", "WR", "TE", "FLEX", "FLEX", "K", "DEF",
        ];
        for (i, pos) in expected.iter().enumerate() {
            assert_eq!(required_position(i).unwrap().as_str(), *pos, "index {i}");
        }
    }

    #[test]
    fn index_past_lineup_fails() {
        assert_eq!(
            required_position(11),
            Err(SlotError::UnknownSlot { index: 11 })
        );
        assert!(required_position(42).is_err());
    }

    #[test]
    fn standard_layout_delegates_to_table() {
        let layout = StandardLayout;
        assert_eq!(layout.position_at(6), Ok(Position::TightEnd));
        assert!(layout.position_at(STANDARD_STARTER_COUNT).is_err());
    }

    #[test]
    fn from_str_pos_round_trips_display() {
        for i in 0..STANDARD_STARTER_COUNT {
            let pos = required_position(i).unwrap();
            assert_eq!(Position::from_str_pos(&pos.to_string()), Some(pos));
        }
        assert_eq!(Position::from_str_pos("flex"), Some(Position::Flex));
        assert_eq!(Position::from_str_pos("SUPER_FLEX"), None);
    }

    fn league_with(positions: &[&str]) -> League {
        League {
            league_id: "1".into(),
            name: "Test".into(),
            season: None,
            total_rosters: None,
            roster_positions: positions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn league_layout_check() {
        let standard = league_with(&[
            "QB", "RB", "RB", "WR", "WR", "WR", "TE", "FLEX", "FLEX", "K", "DEF", "BN", "BN",
        ]);
        assert!(layout_matches_league(&standard));

        let superflex = league_with(&[
            "QB", "RB", "RB", "WR", "WR", "WR", "TE", "FLEX", "SUPER_FLEX", "K", "DEF",
        ]);
        assert!(!layout_matches_league(&superflex));

        let short = league_with(&["QB", "RB", "WR", "TE", "K", "DEF", "BN"]);
        assert!(!layout_matches_league(&short));
    }
}
