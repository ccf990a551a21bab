//! Administrator write paths.
//!
//! Input validation happens here, at the point of recording, so the
//! aggregation core never sees malformed data. Every successful mutation
//! sends a [`Change`] so the standings consumer picks it up.

use chrono::{NaiveDate, Utc};

use open_league_core::{schedule, Fixture, FixtureId, TeamId, TournamentId};

use crate::events::{Change, ChangeWriter};
use crate::store::TournamentStore;
use crate::{Error, Result};

/// The outcome of a fixture (re)generation request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The previous fixture set was replaced with this many new fixtures.
    Replaced(usize),
    /// Fewer than two teams are registered; nothing was changed.
    InsufficientTeams,
}

/// Regenerates the round-robin schedule of the tournament, replacing all
/// existing fixtures.
///
/// This is destructive: the previous fixture set, results included, is
/// discarded. Obtaining operator confirmation beforehand is the caller's
/// responsibility.
///
/// With fewer than two registered teams nothing is replaced and
/// [`GenerateOutcome::InsufficientTeams`] is returned. That is a notice for
/// the operator, not a failure.
///
/// # Errors
///
/// Returns an error if the tournament does not exist.
pub async fn generate_fixtures<S>(
    store: &S,
    events: &ChangeWriter,
    tournament: TournamentId,
) -> Result<GenerateOutcome>
where
    S: TournamentStore,
{
    let options = store
        .options(tournament)
        .ok_or(Error::UnknownTournament(tournament))?;
    let teams = store.teams(tournament);

    if teams.len() < 2 {
        log::info!(
            "Not generating fixtures for {}: only {} team(s) registered",
            tournament,
            teams.len()
        );
        return Ok(GenerateOutcome::InsufficientTeams);
    }

    let start = Utc::now().date_naive();
    let schedule = schedule::generate(&teams, options.mode, start);
    let count = schedule.len();

    store.replace_fixtures(tournament, schedule.into_fixtures());
    log::info!("Replaced fixtures of {} with {} new fixtures", tournament, count);

    events.send(Change::Fixtures(tournament)).await;
    Ok(GenerateOutcome::Replaced(count))
}

/// Creates a single ad-hoc fixture outside the generated schedule
/// (week 0), returning its id.
///
/// # Errors
///
/// Returns an error if the tournament does not exist, either team is not on
/// the roster, or the two sides are the same team.
pub async fn add_fixture<S>(
    store: &S,
    events: &ChangeWriter,
    tournament: TournamentId,
    home: TeamId,
    away: TeamId,
    date: NaiveDate,
) -> Result<FixtureId>
where
    S: TournamentStore,
{
    if store.options(tournament).is_none() {
        return Err(Error::UnknownTournament(tournament));
    }

    let teams = store.teams(tournament);
    for team in [home, away] {
        if !teams.iter().any(|other| other.id == team) {
            return Err(Error::UnknownTeam(team));
        }
    }

    let fixture = Fixture::new(FixtureId(0), home, away, 0, date)?;
    let id = store.insert_fixture(tournament, fixture);

    events.send(Change::Fixtures(tournament)).await;
    Ok(id)
}

/// Records the final score of a fixture, transitioning it from scheduled to
/// completed.
///
/// Scores arrive as raw integers from the outside world and are validated
/// here: negative or out-of-range values are rejected before anything is
/// written.
///
/// # Errors
///
/// Returns an error if either score is invalid or the fixture does not
/// exist.
pub async fn record_result<S>(
    store: &S,
    events: &ChangeWriter,
    tournament: TournamentId,
    fixture: FixtureId,
    score_home: i64,
    score_away: i64,
) -> Result<()>
where
    S: TournamentStore,
{
    let score_home = validate_score(score_home)?;
    let score_away = validate_score(score_away)?;

    let mut target = store
        .fixture(tournament, fixture)
        .ok_or(Error::UnknownFixture(fixture))?;

    target.complete(score_home, score_away);

    if !store.update_fixture(tournament, target) {
        return Err(Error::UnknownFixture(fixture));
    }

    events.send(Change::Fixtures(tournament)).await;
    Ok(())
}

fn validate_score(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidScore(value))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use open_league_core::{
        Error as CoreError, FixtureId, FixtureMode, FixtureStatus, TournamentOptions,
    };

    use crate::events;
    use crate::store::{MemoryStore, TournamentStore};
    use crate::Error;

    use super::{add_fixture, generate_fixtures, record_result, GenerateOutcome};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 5).unwrap()
    }

    fn store_with_teams(names: &[&str], mode: FixtureMode) -> (MemoryStore, open_league_core::TournamentId) {
        let store = MemoryStore::new();
        let tournament = store.create_tournament(TournamentOptions {
            mode,
            ..TournamentOptions::default()
        });

        for name in names {
            store.insert_team(tournament, name).unwrap();
        }

        (store, tournament)
    }

    #[tokio::test]
    async fn test_generate_insufficient_teams() {
        let (store, tournament) = store_with_teams(&["A"], FixtureMode::Single);
        let events = events::spawn(store.clone());

        let outcome = generate_fixtures(&store, &events, tournament).await.unwrap();
        assert_eq!(outcome, GenerateOutcome::InsufficientTeams);
        assert!(store.fixtures(tournament).is_empty());
    }

    #[tokio::test]
    async fn test_generate_replaces_existing() {
        let (store, tournament) = store_with_teams(&["A", "B", "C", "D"], FixtureMode::Single);
        let events = events::spawn(store.clone());

        let outcome = generate_fixtures(&store, &events, tournament).await.unwrap();
        assert_eq!(outcome, GenerateOutcome::Replaced(6));

        let first = store.fixtures(tournament);
        assert_eq!(first.len(), 6);

        // Regeneration discards the previous set entirely.
        let outcome = generate_fixtures(&store, &events, tournament).await.unwrap();
        assert_eq!(outcome, GenerateOutcome::Replaced(6));

        let second = store.fixtures(tournament);
        assert_eq!(second.len(), 6);
        for fixture in &second {
            assert!(first.iter().all(|old| old.id != fixture.id));
        }
    }

    #[tokio::test]
    async fn test_generate_home_and_away() {
        let (store, tournament) = store_with_teams(&["A", "B", "C"], FixtureMode::HomeAndAway);
        let events = events::spawn(store.clone());

        let outcome = generate_fixtures(&store, &events, tournament).await.unwrap();
        assert_eq!(outcome, GenerateOutcome::Replaced(6));
    }

    #[tokio::test]
    async fn test_add_fixture_validation() {
        let (store, tournament) = store_with_teams(&["A", "B"], FixtureMode::Single);
        let events = events::spawn(store.clone());

        let teams = store.teams(tournament);
        let (a, b) = (teams[0].id, teams[1].id);

        let id = add_fixture(&store, &events, tournament, a, b, date()).await.unwrap();
        let fixture = store.fixture(tournament, id).unwrap();
        assert_eq!(fixture.week, 0);
        assert_eq!(fixture.status, FixtureStatus::Scheduled);

        assert_eq!(
            add_fixture(&store, &events, tournament, a, a, date()).await,
            Err(Error::Core(CoreError::SelfPairing(a)))
        );

        let ghost = open_league_core::TeamId(u64::MAX);
        assert_eq!(
            add_fixture(&store, &events, tournament, a, ghost, date()).await,
            Err(Error::UnknownTeam(ghost))
        );
    }

    #[tokio::test]
    async fn test_record_result_validation() {
        let (store, tournament) = store_with_teams(&["A", "B"], FixtureMode::Single);
        let events = events::spawn(store.clone());

        generate_fixtures(&store, &events, tournament).await.unwrap();
        let fixture = store.fixtures(tournament)[0].clone();

        assert_eq!(
            record_result(&store, &events, tournament, fixture.id, -1, 0).await,
            Err(Error::InvalidScore(-1))
        );
        assert_eq!(
            record_result(&store, &events, tournament, fixture.id, 0, i64::MAX).await,
            Err(Error::InvalidScore(i64::MAX))
        );
        assert_eq!(
            record_result(&store, &events, tournament, FixtureId(u64::MAX), 1, 0).await,
            Err(Error::UnknownFixture(FixtureId(u64::MAX)))
        );

        // Nothing was written by the rejected attempts.
        assert_eq!(
            store.fixture(tournament, fixture.id).unwrap().status,
            FixtureStatus::Scheduled
        );

        record_result(&store, &events, tournament, fixture.id, 2, 1)
            .await
            .unwrap();

        let updated = store.fixture(tournament, fixture.id).unwrap();
        assert_eq!(updated.status, FixtureStatus::Completed);
        assert_eq!(updated.result(), Some((2, 1)));
    }
}
