// Roster join: rosters + league users + player directory -> teams of
// positional starter slots.

use serde::Serialize;
use tracing::debug;

use crate::directory::PlayerDirectory;
use crate::error::SlotError;
use crate::model::{Player, Roster, User};
use crate::position::{Position, SlotLayout, StandardLayout};

/// A team's starting lineup with owner details resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub owner_name: Option<String>,
    pub team_name: Option<String>,
    pub starters: Vec<StarterSlot>,
}

/// One starting slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarterSlot {
    pub index: usize,
    pub position: Position,
    /// `None` for an unfilled slot or an id the directory does not know.
    pub player: Option<Player>,
}

/// Join with the standard lineup layout.
pub fn join(
    rosters: &[Roster],
    users: &[User],
    directory: &PlayerDirectory,
) -> Result<Vec<Team>, SlotError> {
    join_with_layout(rosters, users, directory, &StandardLayout)
}

/// Join rosters to their owners and starters to their player records.
///
/// Output follows roster order; starters keep their positional index.
pub fn join_with_layout(
    rosters: &[Roster],
    users: &[User],
    directory: &PlayerDirectory,
    layout: &dyn SlotLayout,
) -> Result<Vec<Team>, SlotError> {
    rosters
        .iter()
        .map(|roster| {
            // Leagues hold a few dozen users at most.
            let owner = roster
                .owner_id
                .as_deref()
                .and_then(|id| users.iter().find(|u| u.user_id == id));
            if owner.is_none() {
                debug!(roster_id = roster.roster_id, "roster has no matching owner");
            }

            let starters = roster
                .starters
                .iter()
                .enumerate()
                .map(|(index, id)| {
                    Ok(StarterSlot {
                        index,
                        position: layout.position_at(index)?,
                        player: directory.get(id).cloned(),
                    })
                })
                .collect::<Result<Vec<_>, SlotError>>()?;

            Ok(Team {
                owner_name: owner.map(|u| u.display_name.clone()),
                team_name: owner.and_then(User::team_name).map(str::to_string),
                starters,
            })
        })
        .collect()
}
