// Lineup evaluation: joins league rosters with the player catalog, flags
// problem starters, and renders them as chat alerts.

pub mod classify;
pub mod directory;
pub mod error;
pub mod format;
pub mod join;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod model;
pub mod pipeline;
pub mod position;
pub mod source;
