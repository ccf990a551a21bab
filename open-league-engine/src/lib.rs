//! # open-league-engine
//!
//! The embedding layer around [`open_league_core`]: a storage seam
//! ([`TournamentStore`]), the administrator write paths ([`admin`]), and the
//! change-event channel that keeps standings in sync with recorded results
//! ([`events`]).
//!
//! The engine owns no persistence. Host applications implement
//! [`TournamentStore`] over whatever database they use; [`MemoryStore`] is
//! the in-memory reference implementation and test double.
//!
//! Authentication and authorization are likewise the host's concern: the
//! engine assumes every call it receives is already permitted to mutate the
//! tournament it names.
//!
pub mod admin;
pub mod events;
pub mod store;

pub use admin::GenerateOutcome;
pub use events::{Change, ChangeWriter};
pub use store::{MemoryStore, TournamentStore};

use open_league_core::{FixtureId, TeamId, TournamentId};

use thiserror::Error;

use std::result;

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("no tournament with id {0}")]
    UnknownTournament(TournamentId),
    #[error("no fixture with id {0}")]
    UnknownFixture(FixtureId),
    #[error("no team with id {0}")]
    UnknownTeam(TeamId),
    #[error("invalid score {0}: scores are non-negative integers")]
    InvalidScore(i64),
    #[error(transparent)]
    Core(#[from] open_league_core::Error),
}
