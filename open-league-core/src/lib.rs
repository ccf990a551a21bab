//! # open-league-core
//!
//! This crate contains the computational core for running a league
//! tournament: generating a round-robin fixture schedule and deriving ranked
//! standings from completed results.
//!
//! Important types:
//! - [`Team`]: a participant, identified by a stable [`TeamId`].
//! - [`Roster`]: the validated set of teams registered for a tournament.
//! - [`Fixture`]: a pairing of two teams in a week, possibly completed with
//! a score.
//! - [`Schedule`]: the week-partitioned fixture list produced by
//! [`schedule::generate`].
//! - [`Standings`]: the ranked table produced by [`standings::compute`].
//! - [`TournamentOptions`]: scoring and fixture-mode configuration.
//!
//! Both operations are pure: they perform no I/O and derive their output
//! entirely from their explicit inputs, so they may be called concurrently
//! without coordination. Persistence and change notification belong to the
//! embedding application.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to the entity types.
//!
pub mod options;
pub mod schedule;
pub mod standings;

mod id;

pub use id::{FixtureId, TeamId, TournamentId};
pub use options::{FixtureMode, TournamentOptions};
pub use schedule::Schedule;
pub use standings::{Standings, StandingsEntry};

use thiserror::Error;

use chrono::NaiveDate;

use std::ops::Deref;
use std::result;
use std::slice;
use std::vec::IntoIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

/// Validation errors raised on the tournament write paths.
///
/// Expected steady-state conditions (too few teams to schedule, a fixture
/// referencing a deleted team) are not errors; they are reported through
/// return values by the operations that encounter them.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("team name is empty")]
    EmptyTeamName,
    #[error("a team named {0:?} already exists")]
    DuplicateTeamName(String),
    #[error("fixture pairs team {0} against itself")]
    SelfPairing(TeamId),
}

/// A team participating in a tournament.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    #[inline]
    pub fn new<T>(id: TeamId, name: T) -> Self
    where
        T: ToString,
    {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// The validated set of teams registered for a tournament.
///
/// Names are non-empty and unique within the roster, compared
/// case-insensitively. Leading and trailing whitespace is stripped on
/// insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Roster {
    teams: Vec<Team>,
}

impl Roster {
    /// Creates a new empty `Roster`.
    #[inline]
    pub fn new() -> Self {
        Self { teams: Vec::new() }
    }

    /// Creates a new empty `Roster` with the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            teams: Vec::with_capacity(capacity),
        }
    }

    /// Registers a new team.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty after trimming, or if another
    /// team already uses the name (names are compared case-insensitively).
    pub fn insert(&mut self, team: Team) -> Result<()> {
        let name = team.name.trim();

        if name.is_empty() {
            return Err(Error::EmptyTeamName);
        }

        if self.contains_name(name) {
            return Err(Error::DuplicateTeamName(name.to_owned()));
        }

        self.teams.push(Team {
            id: team.id,
            name: name.to_owned(),
        });
        Ok(())
    }

    /// Removes the team with the given `id`, returning it.
    ///
    /// Fixtures referencing the removed team are untouched; the aggregation
    /// in [`standings::compute`] skips their contribution for that side.
    pub fn remove(&mut self, id: TeamId) -> Option<Team> {
        let index = self.teams.iter().position(|team| team.id == id)?;
        Some(self.teams.remove(index))
    }

    /// Returns the team with the given `id`.
    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    /// Returns `true` if a team with the given name exists, compared
    /// case-insensitively.
    pub fn contains_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.teams
            .iter()
            .any(|team| team.name.to_lowercase() == name)
    }

    /// Removes every team from the roster.
    #[inline]
    pub fn clear(&mut self) {
        self.teams.clear();
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Team> {
        self.teams.iter()
    }
}

impl Deref for Roster {
    type Target = [Team];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.teams
    }
}

impl IntoIterator for Roster {
    type Item = Team;
    type IntoIter = IntoIter<Team>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.teams.into_iter()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Team;
    type IntoIter = slice::Iter<'a, Team>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.teams.iter()
    }
}

/// The lifecycle state of a [`Fixture`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FixtureStatus {
    #[default]
    Scheduled,
    Completed,
}

/// A single pairing of two teams.
///
/// `week` partitions the schedule; week `0` is reserved for ad-hoc fixtures
/// created outside the generated schedule. Scores are only present once the
/// fixture is completed and are never read while it is scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fixture {
    pub id: FixtureId,
    pub home: TeamId,
    pub away: TeamId,
    pub week: u32,
    pub date: NaiveDate,
    pub status: FixtureStatus,
    pub score_home: Option<u32>,
    pub score_away: Option<u32>,
}

impl Fixture {
    /// Creates a new scheduled fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if `home` and `away` are the same team.
    pub fn new(
        id: FixtureId,
        home: TeamId,
        away: TeamId,
        week: u32,
        date: NaiveDate,
    ) -> Result<Self> {
        if home == away {
            return Err(Error::SelfPairing(home));
        }

        Ok(Self {
            id,
            home,
            away,
            week,
            date,
            status: FixtureStatus::Scheduled,
            score_home: None,
            score_away: None,
        })
    }

    /// Records the final score, transitioning the fixture to completed.
    pub fn complete(&mut self, score_home: u32, score_away: u32) {
        self.score_home = Some(score_home);
        self.score_away = Some(score_away);
        self.status = FixtureStatus::Completed;
    }

    /// Returns `true` if the fixture has been played.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == FixtureStatus::Completed
    }

    /// Returns the final `(home, away)` score, or `None` while the fixture
    /// is still scheduled.
    ///
    /// A completed fixture missing a score reads as 0 for that side. That is
    /// a recovery behavior for malformed external data; the write path is
    /// expected to reject such records.
    pub fn result(&self) -> Option<(u32, u32)> {
        if !self.is_completed() {
            return None;
        }

        Some((
            self.score_home.unwrap_or(0),
            self.score_away.unwrap_or(0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Error, Fixture, FixtureId, FixtureStatus, Roster, Team, TeamId};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 5).unwrap()
    }

    #[test]
    fn test_roster_insert() {
        let mut roster = Roster::new();
        roster.insert(Team::new(TeamId(1), "Arsenal")).unwrap();
        roster.insert(Team::new(TeamId(2), "  Bolton ")).unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get(TeamId(2)).unwrap().name, "Bolton");

        assert_eq!(
            roster.insert(Team::new(TeamId(3), "ARSENAL")),
            Err(Error::DuplicateTeamName(String::from("ARSENAL")))
        );
        assert_eq!(
            roster.insert(Team::new(TeamId(3), "   ")),
            Err(Error::EmptyTeamName)
        );
    }

    #[test]
    fn test_roster_remove_keeps_fixtures_out_of_scope() {
        let mut roster = Roster::new();
        roster.insert(Team::new(TeamId(1), "A")).unwrap();
        roster.insert(Team::new(TeamId(2), "B")).unwrap();

        let removed = roster.remove(TeamId(1)).unwrap();
        assert_eq!(removed.name, "A");
        assert!(roster.get(TeamId(1)).is_none());
        assert_eq!(roster.len(), 1);
        assert!(roster.remove(TeamId(1)).is_none());
    }

    #[test]
    fn test_fixture_self_pairing() {
        assert_eq!(
            Fixture::new(FixtureId(1), TeamId(7), TeamId(7), 1, date()),
            Err(Error::SelfPairing(TeamId(7)))
        );
    }

    #[test]
    fn test_fixture_complete() {
        let mut fixture = Fixture::new(FixtureId(1), TeamId(1), TeamId(2), 1, date()).unwrap();
        assert_eq!(fixture.status, FixtureStatus::Scheduled);
        assert_eq!(fixture.result(), None);

        fixture.complete(3, 1);
        assert_eq!(fixture.status, FixtureStatus::Completed);
        assert_eq!(fixture.result(), Some((3, 1)));
    }
}
