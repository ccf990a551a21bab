//! Standings aggregation.
//!
//! The table is always rebuilt from the complete fixture set rather than
//! patched incrementally, so it can never drift from the results it is
//! derived from. Rebuilding is idempotent: the same inputs produce the same
//! table.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Deref;
use std::slice;
use std::vec::IntoIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Fixture, Team, TeamId};

/// A single row of the standings table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StandingsEntry {
    pub team: TeamId,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u64,
}

impl StandingsEntry {
    fn new(team: &Team) -> Self {
        Self {
            team: team.id,
            name: team.name.clone(),
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }
}

/// The ranked standings table.
///
/// Contains exactly one entry per roster team, ordered best first. The
/// embedding application persists entries keyed by team id (upsert
/// semantics).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Standings {
    entries: Vec<StandingsEntry>,
}

impl Standings {
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, StandingsEntry> {
        self.entries.iter()
    }

    /// Returns the entry for the given team.
    pub fn entry(&self, team: TeamId) -> Option<&StandingsEntry> {
        self.entries.iter().find(|entry| entry.team == team)
    }

    /// Consumes the `Standings`, returning the ordered entries.
    #[inline]
    pub fn into_entries(self) -> Vec<StandingsEntry> {
        self.entries
    }
}

impl Deref for Standings {
    type Target = [StandingsEntry];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl IntoIterator for Standings {
    type Item = StandingsEntry;
    type IntoIter = IntoIter<StandingsEntry>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Standings {
    type Item = &'a StandingsEntry;
    type IntoIter = slice::Iter<'a, StandingsEntry>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Computes the ranked standings for `teams` over `fixtures`.
///
/// Only completed fixtures contribute; a scheduled fixture adds nothing even
/// if scores are attached. A side referencing a team that is no longer in
/// the roster (deleted after the fixture was created) is skipped without
/// failing, while the known side still accumulates normally.
///
/// The resulting order is total: points, then goal difference, then goals
/// scored, all descending, with team name ascending as the final
/// deterministic fallback.
pub fn compute(
    teams: &[Team],
    fixtures: &[Fixture],
    points_per_win: u32,
    points_per_draw: u32,
) -> Standings {
    let mut table: HashMap<TeamId, StandingsEntry> = teams
        .iter()
        .map(|team| (team.id, StandingsEntry::new(team)))
        .collect();

    for fixture in fixtures {
        let (score_home, score_away) = match fixture.result() {
            Some(result) => result,
            None => continue,
        };

        match table.get_mut(&fixture.home) {
            Some(entry) => {
                entry.played += 1;
                entry.goals_for += score_home;
                entry.goals_against += score_away;
            }
            None => log::warn!(
                "Fixture {} references unknown home team {}",
                fixture.id,
                fixture.home
            ),
        }

        match table.get_mut(&fixture.away) {
            Some(entry) => {
                entry.played += 1;
                entry.goals_for += score_away;
                entry.goals_against += score_home;
            }
            None => log::warn!(
                "Fixture {} references unknown away team {}",
                fixture.id,
                fixture.away
            ),
        }

        let (home_outcome, away_outcome) = match score_home.cmp(&score_away) {
            Ordering::Greater => (Outcome::Win, Outcome::Loss),
            Ordering::Less => (Outcome::Loss, Outcome::Win),
            Ordering::Equal => (Outcome::Draw, Outcome::Draw),
        };

        if let Some(entry) = table.get_mut(&fixture.home) {
            home_outcome.apply(entry);
        }
        if let Some(entry) = table.get_mut(&fixture.away) {
            away_outcome.apply(entry);
        }
    }

    let mut entries: Vec<StandingsEntry> = table.into_values().collect();

    for entry in &mut entries {
        entry.goal_difference = i64::from(entry.goals_for) - i64::from(entry.goals_against);
        entry.points = u64::from(entry.wins) * u64::from(points_per_win)
            + u64::from(entry.draws) * u64::from(points_per_draw);
    }

    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_difference.cmp(&a.goal_difference))
            .then_with(|| b.goals_for.cmp(&a.goals_for))
            .then_with(|| a.name.cmp(&b.name))
    });

    Standings { entries }
}

#[derive(Copy, Clone)]
enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    fn apply(self, entry: &mut StandingsEntry) {
        match self {
            Self::Win => entry.wins += 1,
            Self::Draw => entry.draws += 1,
            Self::Loss => entry.losses += 1,
        }
    }
}
