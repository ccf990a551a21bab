//! Change notifications driving standings recomputation.
//!
//! The behavior "recompute the standings whenever results change" is modeled
//! as an explicit event instead of a storage-layer subscription: every write
//! path sends a [`Change`] and a spawned consumer re-reads the tournament
//! state and rebuilds the table with [`recompute`].
//!
//! Because every pass re-reads the full state before aggregating and the
//! aggregation is idempotent, concurrent writers need no coordination; the
//! last completed pass wins.

use open_league_core::{standings, TournamentId};

use tokio::sync::mpsc;

use crate::store::TournamentStore;

/// A mutation of tournament state that invalidates the standings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Change {
    /// Fixtures were created, replaced or completed.
    Fixtures(TournamentId),
    /// Teams were added to or removed from the roster.
    Teams(TournamentId),
    /// The tournament configuration changed.
    Options(TournamentId),
}

impl Change {
    /// Returns the tournament the change applies to.
    #[inline]
    pub fn tournament(self) -> TournamentId {
        match self {
            Self::Fixtures(id) | Self::Teams(id) | Self::Options(id) => id,
        }
    }
}

/// Spawns the change consumer, returning the writer handle for the write
/// paths.
///
/// The consumer stops once every [`ChangeWriter`] has been dropped.
pub fn spawn<S>(store: S) -> ChangeWriter
where
    S: TournamentStore + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Change>(32);

    tokio::task::spawn(async move {
        while let Some(change) = rx.recv().await {
            log::debug!("Applying {:?}", change);
            recompute(&store, change.tournament());
        }

        log::debug!("All ChangeWriters dropped, stopping standings recomputation");
    });

    ChangeWriter { tx }
}

/// Rebuilds the standings of `tournament` from a fresh read of its state.
pub fn recompute<S>(store: &S, tournament: TournamentId)
where
    S: TournamentStore + ?Sized,
{
    let options = match store.options(tournament) {
        Some(options) => options,
        None => {
            log::error!("Cannot recompute standings: no tournament {}", tournament);
            return;
        }
    };

    let teams = store.teams(tournament);
    let fixtures = store.fixtures(tournament);

    let standings = standings::compute(
        &teams,
        &fixtures,
        options.points_per_win,
        options.points_per_draw,
    );

    store.put_standings(tournament, standings);
}

/// The sending half of the change channel.
#[derive(Clone, Debug)]
pub struct ChangeWriter {
    tx: mpsc::Sender<Change>,
}

impl ChangeWriter {
    pub async fn send(&self, change: Change) {
        let _ = self.tx.send(change).await;
    }
}
