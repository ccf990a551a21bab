//! # Tournament Options
//!
//! Scoring and scheduling configuration consumed by the core operations.
//! The core holds no persistent configuration state; the embedding
//! application stores one [`TournamentOptions`] per tournament and passes it
//! in on every call.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How many times each pair of teams meets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FixtureMode {
    /// A single round-robin; every pair plays once.
    #[default]
    Single,
    /// A double round-robin; every pair plays twice, once with each side
    /// at home.
    HomeAndAway,
}

impl FixtureMode {
    /// Returns the number of legs played in this mode.
    #[inline]
    pub fn legs(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::HomeAndAway => 2,
        }
    }
}

/// Per-tournament configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TournamentOptions {
    /// Points awarded for a win. Defaults to 3.
    pub points_per_win: u32,
    /// Points awarded for a draw. Defaults to 1.
    pub points_per_draw: u32,
    pub mode: FixtureMode,
}

impl Default for TournamentOptions {
    #[inline]
    fn default() -> Self {
        Self {
            points_per_win: 3,
            points_per_draw: 1,
            mode: FixtureMode::Single,
        }
    }
}
