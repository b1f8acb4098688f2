// Alert rendering and run summary.

use std::fmt;

use serde::Serialize;

use crate::classify::TeamFindings;
use crate::join::StarterSlot;
use crate::position::Position;

const UNKNOWN_OWNER: &str = "Unknown owner";
const UNKNOWN_TEAM: &str = "Unknown team";
const UNKNOWN_STATUS: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Empty,
    Injured,
    Inactive,
    OnBye,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Empty => "empty",
            Category::Injured => "injured",
            Category::Inactive => "inactive",
            Category::OnBye => "on bye",
        })
    }
}

/// One chat message about one problem starter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub category: Category,
    pub owner_name: Option<String>,
    pub team_name: Option<String>,
    pub position: Position,
    pub text: String,
}

/// Render every finding of a team, empties first, then injured, inactive
/// and bye starters.
pub fn format(findings: &TeamFindings) -> Vec<Alert> {
    let who = format!(
        "{} ({})",
        findings.owner_name.as_deref().unwrap_or(UNKNOWN_OWNER),
        findings.team_name.as_deref().unwrap_or(UNKNOWN_TEAM),
    );

    let alert = |category: Category, slot: &StarterSlot, text: String| Alert {
        category,
        owner_name: findings.owner_name.clone(),
        team_name: findings.team_name.clone(),
        position: slot.position,
        text,
    };

    let mut alerts = Vec::with_capacity(
        findings.empties.len()
            + findings.injured.len()
            + findings.inactives.len()
            + findings.byes.len(),
    );

    for slot in &findings.empties {
        let text = format!("{who} is not starting a player at {}!", slot.position);
        alerts.push(alert(Category::Empty, slot, text));
    }

    for slot in &findings.injured {
        let Some(player) = &slot.player else { continue };
        let injury = player
            .injury_status
            .as_ref()
            .map_or(UNKNOWN_STATUS, |s| s.as_str());
        let text = format!(
            "{who} is starting {} ({injury}) at {}!",
            player.full_name(),
            slot.position
        );
        alerts.push(alert(Category::Injured, slot, text));
    }

    for slot in &findings.inactives {
        let Some(player) = &slot.player else { continue };
        let status = player
            .status
            .as_ref()
            .map_or_else(|| UNKNOWN_STATUS.to_string(), |s| s.as_str().to_uppercase());
        let text = format!(
            "{who} is starting {} ({status}) at {}!",
            player.full_name(),
            slot.position
        );
        alerts.push(alert(Category::Inactive, slot, text));
    }

    for slot in &findings.byes {
        let Some(player) = &slot.player else { continue };
        let text = format!(
            "{who} is starting {} at {}!",
            player.full_name(),
            slot.position
        );
        alerts.push(alert(Category::OnBye, slot, text));
    }

    alerts
}

/// Findings per category across all teams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub empty: usize,
    pub injured: usize,
    pub inactive: usize,
    pub on_bye: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.empty + self.injured + self.inactive + self.on_bye
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} empty, {} injured, {} inactive, {} on bye",
            self.empty, self.injured, self.inactive, self.on_bye
        )
    }
}

pub fn summarize(findings: &[TeamFindings]) -> Counts {
    findings.iter().fold(Counts::default(), |acc, f| Counts {
        empty: acc.empty + f.empties.len(),
        injured: acc.injured + f.injured.len(),
        inactive: acc.inactive + f.inactives.len(),
        on_bye: acc.on_bye + f.byes.len(),
    })
}
