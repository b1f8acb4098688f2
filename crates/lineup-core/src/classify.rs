// Starter classification.
//
// Each starter slot is checked against four independent predicates and the
// hits are bucketed per team. Predicates only see the slot's player and the
// season state.

use serde::Serialize;
use tracing::debug;

use crate::join::{StarterSlot, Team};
use crate::model::{InjuryStatus, Player, RosterStatus, SeasonType, SportState};

// ---------------------------------------------------------------------------
// Bye schedule seam
// ---------------------------------------------------------------------------

/// Answers whether an NFL team has no game in a given week.
pub trait ByeSchedule: Send + Sync {
    fn is_on_bye(&self, team: &str, season_type: SeasonType, week: u8) -> bool;
}

/// Schedule used until real bye data is wired in: nobody is ever on bye.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoByeSchedule;

impl ByeSchedule for NoByeSchedule {
    fn is_on_bye(&self, _team: &str, _season_type: SeasonType, _week: u8) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

pub fn is_empty(player: Option<&Player>) -> bool {
    player.is_none()
}

/// Injured unless the status is absent or exactly `Questionable`.
pub fn is_injured(player: Option<&Player>) -> bool {
    match player {
        None => false,
        Some(p) => !matches!(p.injury_status, None | Some(InjuryStatus::Questionable)),
    }
}

/// Inactive unless the roster status is exactly `Active`. Defenses never are.
pub fn is_inactive(player: Option<&Player>) -> bool {
    match player {
        None => false,
        Some(p) if p.is_defense() => false,
        Some(p) => p.status != Some(RosterStatus::Active),
    }
}

/// On bye only when a week is known and the schedule says so.
pub fn is_on_bye(
    player: Option<&Player>,
    state: &SportState,
    schedule: &dyn ByeSchedule,
) -> bool {
    let Some(week) = state.current_week() else {
        return false;
    };
    let Some(player) = player else {
        return false;
    };
    player
        .team
        .as_deref()
        .is_some_and(|team| schedule.is_on_bye(team, state.season_type, week))
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Problem starters for one team, each list in slot order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamFindings {
    pub owner_name: Option<String>,
    pub team_name: Option<String>,
    pub empties: Vec<StarterSlot>,
    pub injured: Vec<StarterSlot>,
    pub inactives: Vec<StarterSlot>,
    pub byes: Vec<StarterSlot>,
}

impl TeamFindings {
    pub fn is_clean(&self) -> bool {
        self.empties.is_empty()
            && self.injured.is_empty()
            && self.inactives.is_empty()
            && self.byes.is_empty()
    }
}

pub fn classify(teams: &[Team], state: &SportState) -> Vec<TeamFindings> {
    classify_with(teams, state, &NoByeSchedule)
}

/// Classify every starter of every team. Returns one record per team.
pub fn classify_with(
    teams: &[Team],
    state: &SportState,
    schedule: &dyn ByeSchedule,
) -> Vec<TeamFindings> {
    teams
        .iter()
        .map(|team| {
            let mut findings = TeamFindings {
                owner_name: team.owner_name.clone(),
                team_name: team.team_name.clone(),
                empties: Vec::new(),
                injured: Vec::new(),
                inactives: Vec::new(),
                byes: Vec::new(),
            };

            for slot in &team.starters {
                let player = slot.player.as_ref();
                let empty = is_empty(player);
                let injured = is_injured(player);
                let inactive = is_inactive(player);
                let bye = is_on_bye(player, state, schedule);
                debug!(
                    slot = slot.index,
                    position = %slot.position,
                    empty,
                    injured,
                    inactive,
                    bye,
                    "classified starter"
                );

                if empty {
                    findings.empties.push(slot.clone());
                }
                if injured {
                    findings.injured.push(slot.clone());
                }
                if inactive {
                    findings.inactives.push(slot.clone());
                }
                if bye {
                    findings.byes.push(slot.clone());
                }
            }

            findings
        })
        .collect()
}
