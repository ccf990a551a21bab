//! Round-robin fixture generation.
//!
//! The generator uses the circle method: slot 0 is pinned while the
//! remaining slots rotate once per round, and pairs are taken from the
//! outside in. An odd team count gets an implicit bye slot; pairings
//! touching it are dropped, leaving one team idle that week.
//!
//! The order of fixtures within a week is randomized so the presentation
//! order does not reveal the rotation structure. That shuffle is cosmetic:
//! callers must rely only on the set-level guarantees (pair coverage, no
//! self-matches, one match per team per week), never on output order.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{Fixture, FixtureId, FixtureMode, FixtureStatus, Team, TeamId};

use std::ops::Deref;
use std::vec::IntoIter;

/// A complete week-partitioned fixture list.
///
/// Fixtures carry the null id; real ids are assigned when the schedule is
/// persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    fixtures: Vec<Fixture>,
}

impl Schedule {
    /// Creates a new empty `Schedule`.
    #[inline]
    pub fn new() -> Self {
        Self {
            fixtures: Vec::new(),
        }
    }

    /// Returns the number of weeks spanned by the schedule.
    pub fn weeks(&self) -> u32 {
        self.fixtures
            .iter()
            .map(|fixture| fixture.week)
            .max()
            .unwrap_or(0)
    }

    /// Consumes the `Schedule`, returning the fixtures.
    #[inline]
    pub fn into_fixtures(self) -> Vec<Fixture> {
        self.fixtures
    }
}

impl Deref for Schedule {
    type Target = [Fixture];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.fixtures
    }
}

impl IntoIterator for Schedule {
    type Item = Fixture;
    type IntoIter = IntoIter<Fixture>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.fixtures.into_iter()
    }
}

/// Generates a full round-robin schedule for `teams` starting at `start`.
///
/// Every pair of teams meets exactly once, or exactly twice with the sides
/// swapped for [`FixtureMode::HomeAndAway`]. All fixtures of a round share a
/// week number and a date; week `w` is dated `start + 7 * (w - 1)` days.
///
/// Fewer than two teams produce an empty schedule. The caller is expected to
/// report that as an insufficient-teams notice, not as a failure.
pub fn generate(teams: &[Team], mode: FixtureMode, start: NaiveDate) -> Schedule {
    generate_with_rng(teams, mode, start, &mut rand::thread_rng())
}

/// Generates a schedule like [`generate`], drawing the intra-week shuffle
/// from the provided source of entropy.
pub fn generate_with_rng<R>(
    teams: &[Team],
    mode: FixtureMode,
    start: NaiveDate,
    rng: &mut R,
) -> Schedule
where
    R: Rng + ?Sized,
{
    if teams.len() < 2 {
        log::debug!("Not enough teams to schedule: {}", teams.len());
        return Schedule::new();
    }

    log::debug!(
        "Creating new round-robin schedule for {} teams over {} legs",
        teams.len(),
        mode.legs()
    );

    // Slot count including the bye slot for odd team counts. A slot pointing
    // past the end of `teams` is the bye; its pairing has no match that
    // round.
    let slots = if teams.len() % 2 == 0 {
        teams.len()
    } else {
        teams.len() + 1
    };

    let mut rounds: Vec<Vec<(TeamId, TeamId)>> = Vec::with_capacity(slots - 1);

    for round in 0..slots - 1 {
        let mut pairs = Vec::with_capacity(slots / 2);

        for index in 0..slots / 2 {
            let first = circle_slot(slots, round, index);
            let second = circle_slot(slots, round, slots - index - 1);

            if first >= teams.len() || second >= teams.len() {
                continue;
            }

            // Round parity picks the side of the pinned pairing and pair
            // index parity picks it for the rest, so no team is stacked
            // with home matches.
            let home_first = if index == 0 {
                round % 2 == 0
            } else {
                index % 2 == 0
            };

            let (home, away) = if home_first {
                (first, second)
            } else {
                (second, first)
            };

            pairs.push((teams[home].id, teams[away].id));
        }

        pairs.shuffle(rng);
        rounds.push(pairs);
    }

    if mode == FixtureMode::HomeAndAway {
        // The second leg mirrors the first with the sides swapped, appended
        // as additional weeks.
        let mirrored: Vec<Vec<(TeamId, TeamId)>> = rounds
            .iter()
            .map(|pairs| pairs.iter().map(|&(home, away)| (away, home)).collect())
            .collect();

        rounds.extend(mirrored);
    }

    let mut fixtures = Vec::new();
    for (index, pairs) in rounds.into_iter().enumerate() {
        let week = index as u32 + 1;
        let date = start + Duration::days(7 * index as i64);

        for (home, away) in pairs {
            fixtures.push(Fixture {
                id: FixtureId(0),
                home,
                away,
                week,
                date,
                status: FixtureStatus::Scheduled,
                score_home: None,
                score_away: None,
            });
        }
    }

    Schedule { fixtures }
}

/// Returns the slot occupying `index` in a circle of `slots` positions
/// rotated `round` times. Slot 0 is pinned.
#[inline]
fn circle_slot(slots: usize, round: usize, index: usize) -> usize {
    debug_assert!(slots % 2 == 0);

    if index == 0 {
        return 0;
    }

    match index as isize - round as isize {
        res if res <= 0 => slots - res.unsigned_abs() - 1,
        res => res as usize,
    }
}
