//! The storage seam between the engine and the host application.
//!
//! Reads return owned snapshots of the current state. Standings are always
//! recomputed from a fresh read of the full team and fixture sets, never
//! from cached partial state, so a snapshot taken at call time is all the
//! engine needs.

mod id;

use open_league_core::{
    Fixture, FixtureId, Roster, Standings, Team, TeamId, TournamentId, TournamentOptions,
};

use parking_lot::RwLock;

use std::collections::HashMap;
use std::sync::Arc;

use crate::{Error, Result};

/// Storage operations the engine needs from the host application.
///
/// Implementations must make [`replace_fixtures`] atomic from the
/// perspective of readers: the old and the new fixture set must never be
/// visible mixed. A database-backed host typically uses a batch write for
/// this.
///
/// [`replace_fixtures`]: TournamentStore::replace_fixtures
pub trait TournamentStore {
    /// Returns the configuration of the tournament, or `None` if no such
    /// tournament exists.
    fn options(&self, tournament: TournamentId) -> Option<TournamentOptions>;

    /// Returns a snapshot of the tournament roster.
    fn teams(&self, tournament: TournamentId) -> Vec<Team>;

    /// Returns a snapshot of all fixtures of the tournament.
    fn fixtures(&self, tournament: TournamentId) -> Vec<Fixture>;

    /// Returns the fixture with the given id.
    fn fixture(&self, tournament: TournamentId, fixture: FixtureId) -> Option<Fixture>;

    /// Inserts a single fixture, assigning and returning a fresh id.
    fn insert_fixture(&self, tournament: TournamentId, fixture: Fixture) -> FixtureId;

    /// Replaces the entire fixture set with `fixtures`, assigning fresh ids.
    fn replace_fixtures(&self, tournament: TournamentId, fixtures: Vec<Fixture>);

    /// Overwrites the fixture matching `fixture.id`. Returns `false` if no
    /// such fixture exists.
    fn update_fixture(&self, tournament: TournamentId, fixture: Fixture) -> bool;

    /// Upserts the standings table of the tournament, keyed by team id.
    fn put_standings(&self, tournament: TournamentId, standings: Standings);
}

/// An in-memory [`TournamentStore`].
///
/// Cloning is cheap; all clones share the same state. Mutations take a
/// single write lock, so readers never observe a partially replaced fixture
/// set.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tournaments: Arc<RwLock<HashMap<TournamentId, Tournament>>>,
}

#[derive(Clone, Debug, Default)]
struct Tournament {
    options: TournamentOptions,
    teams: Roster,
    fixtures: Vec<Fixture>,
    standings: Standings,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new tournament with the given options, returning its id.
    pub fn create_tournament(&self, options: TournamentOptions) -> TournamentId {
        let id = TournamentId(id::TOURNAMENT.generate());

        self.tournaments.write().insert(
            id,
            Tournament {
                options,
                ..Tournament::default()
            },
        );

        log::debug!("Created tournament {}", id);
        id
    }

    /// Registers a new team, returning its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the tournament does not exist or the name fails
    /// roster validation.
    pub fn insert_team(&self, tournament: TournamentId, name: &str) -> Result<TeamId> {
        let mut tournaments = self.tournaments.write();
        let state = tournaments
            .get_mut(&tournament)
            .ok_or(Error::UnknownTournament(tournament))?;

        let id = TeamId(id::TEAM.generate());
        state.teams.insert(Team::new(id, name))?;
        Ok(id)
    }

    /// Removes a team from the roster.
    ///
    /// Fixtures referencing the team are left in place; the aggregator
    /// skips their contribution for that side.
    pub fn remove_team(&self, tournament: TournamentId, team: TeamId) -> Result<Team> {
        let mut tournaments = self.tournaments.write();
        let state = tournaments
            .get_mut(&tournament)
            .ok_or(Error::UnknownTournament(tournament))?;

        state.teams.remove(team).ok_or(Error::UnknownTeam(team))
    }

    /// Removes every team from the roster.
    pub fn clear_teams(&self, tournament: TournamentId) -> Result<()> {
        let mut tournaments = self.tournaments.write();
        let state = tournaments
            .get_mut(&tournament)
            .ok_or(Error::UnknownTournament(tournament))?;

        state.teams.clear();
        Ok(())
    }

    /// Overwrites the tournament configuration.
    pub fn set_options(&self, tournament: TournamentId, options: TournamentOptions) -> Result<()> {
        let mut tournaments = self.tournaments.write();
        let state = tournaments
            .get_mut(&tournament)
            .ok_or(Error::UnknownTournament(tournament))?;

        state.options = options;
        Ok(())
    }

    /// Returns the current standings table of the tournament.
    pub fn standings(&self, tournament: TournamentId) -> Option<Standings> {
        let tournaments = self.tournaments.read();
        Some(tournaments.get(&tournament)?.standings.clone())
    }
}

impl TournamentStore for MemoryStore {
    fn options(&self, tournament: TournamentId) -> Option<TournamentOptions> {
        let tournaments = self.tournaments.read();
        Some(tournaments.get(&tournament)?.options)
    }

    fn teams(&self, tournament: TournamentId) -> Vec<Team> {
        let tournaments = self.tournaments.read();
        match tournaments.get(&tournament) {
            Some(state) => state.teams.to_vec(),
            None => Vec::new(),
        }
    }

    fn fixtures(&self, tournament: TournamentId) -> Vec<Fixture> {
        let tournaments = self.tournaments.read();
        match tournaments.get(&tournament) {
            Some(state) => state.fixtures.clone(),
            None => Vec::new(),
        }
    }

    fn fixture(&self, tournament: TournamentId, fixture: FixtureId) -> Option<Fixture> {
        let tournaments = self.tournaments.read();
        tournaments
            .get(&tournament)?
            .fixtures
            .iter()
            .find(|other| other.id == fixture)
            .cloned()
    }

    fn insert_fixture(&self, tournament: TournamentId, mut fixture: Fixture) -> FixtureId {
        let id = FixtureId(id::FIXTURE.generate());
        fixture.id = id;

        let mut tournaments = self.tournaments.write();
        if let Some(state) = tournaments.get_mut(&tournament) {
            state.fixtures.push(fixture);
        }

        id
    }

    fn replace_fixtures(&self, tournament: TournamentId, mut fixtures: Vec<Fixture>) {
        for fixture in &mut fixtures {
            fixture.id = FixtureId(id::FIXTURE.generate());
        }

        let mut tournaments = self.tournaments.write();
        if let Some(state) = tournaments.get_mut(&tournament) {
            state.fixtures = fixtures;
        }
    }

    fn update_fixture(&self, tournament: TournamentId, fixture: Fixture) -> bool {
        let mut tournaments = self.tournaments.write();
        let state = match tournaments.get_mut(&tournament) {
            Some(state) => state,
            None => return false,
        };

        match state.fixtures.iter_mut().find(|other| other.id == fixture.id) {
            Some(slot) => {
                *slot = fixture;
                true
            }
            None => false,
        }
    }

    fn put_standings(&self, tournament: TournamentId, standings: Standings) {
        let mut tournaments = self.tournaments.write();
        if let Some(state) = tournaments.get_mut(&tournament) {
            state.standings = standings;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use open_league_core::{Error as CoreError, Fixture, FixtureId, TournamentOptions};

    use crate::Error;

    use super::{MemoryStore, TournamentStore};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 5).unwrap()
    }

    #[test]
    fn test_team_name_validation() {
        let store = MemoryStore::new();
        let tournament = store.create_tournament(TournamentOptions::default());

        store.insert_team(tournament, "Arsenal").unwrap();
        assert_eq!(
            store.insert_team(tournament, "arsenal"),
            Err(Error::Core(CoreError::DuplicateTeamName(String::from(
                "arsenal"
            ))))
        );
        assert_eq!(
            store.insert_team(tournament, "  "),
            Err(Error::Core(CoreError::EmptyTeamName))
        );
    }

    #[test]
    fn test_replace_fixtures_assigns_ids() {
        let store = MemoryStore::new();
        let tournament = store.create_tournament(TournamentOptions::default());
        let a = store.insert_team(tournament, "A").unwrap();
        let b = store.insert_team(tournament, "B").unwrap();

        let fixture = Fixture::new(FixtureId(0), a, b, 1, date()).unwrap();
        store.replace_fixtures(tournament, vec![fixture]);

        let fixtures = store.fixtures(tournament);
        assert_eq!(fixtures.len(), 1);
        assert_ne!(fixtures[0].id, FixtureId(0));
        assert_eq!(store.fixture(tournament, fixtures[0].id), Some(fixtures[0].clone()));
    }

    #[test]
    fn test_remove_team_leaves_fixtures() {
        let store = MemoryStore::new();
        let tournament = store.create_tournament(TournamentOptions::default());
        let a = store.insert_team(tournament, "A").unwrap();
        let b = store.insert_team(tournament, "B").unwrap();

        let fixture = Fixture::new(FixtureId(0), a, b, 1, date()).unwrap();
        store.insert_fixture(tournament, fixture);

        store.remove_team(tournament, b).unwrap();
        assert_eq!(store.teams(tournament).len(), 1);
        assert_eq!(store.fixtures(tournament).len(), 1);
    }

    #[test]
    fn test_clear_teams_and_set_options() {
        let store = MemoryStore::new();
        let tournament = store.create_tournament(TournamentOptions::default());
        store.insert_team(tournament, "A").unwrap();
        store.insert_team(tournament, "B").unwrap();

        store.clear_teams(tournament).unwrap();
        assert!(store.teams(tournament).is_empty());

        let options = TournamentOptions {
            points_per_win: 2,
            ..TournamentOptions::default()
        };
        store.set_options(tournament, options).unwrap();
        assert_eq!(store.options(tournament), Some(options));
    }

    #[test]
    fn test_unknown_tournament() {
        let store = MemoryStore::new();
        let bogus = open_league_core::TournamentId(42);

        assert!(store.options(bogus).is_none());
        assert!(store.teams(bogus).is_empty());
        assert_eq!(
            store.insert_team(bogus, "A"),
            Err(Error::UnknownTournament(bogus))
        );
    }
}
