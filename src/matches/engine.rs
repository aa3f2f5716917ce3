//! The shareable `Match` handle.

use std::sync::Arc;

use im::HashSet as ImHashSet;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{MatchConfig, PlayerId, Word};
use crate::error::Result;
use crate::gate::WaitHandle;

use super::rematch::RematchHandle;
use super::round::RoundHandle;
use super::state::MatchState;
use super::{MatchId, MatchStatus};

/// One group of players playing together.
///
/// `Match` is a cheap `Clone` handle; every clone refers to the same match.
/// All state sits behind one mutex per match, which is never held across
/// an `.await`. Different matches share nothing.
#[derive(Clone, Debug)]
pub struct Match {
    inner: Arc<Mutex<MatchState>>,
}

impl Match {
    /// Create an empty match.
    pub fn new(id: MatchId, config: MatchConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MatchState::new(id, config))),
        }
    }

    /// Create an empty match of `capacity` players with default settings.
    pub fn with_capacity(id: MatchId, capacity: usize) -> Self {
        Self::new(id, MatchConfig::new(capacity))
    }

    /// Do both handles refer to the same match?
    #[must_use]
    pub fn same_match(&self, other: &Match) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // === Operations ===

    /// Add a player.
    ///
    /// Fails with `DuplicatePlayer`, `MatchDisbanded` or `MatchFull`. The
    /// returned handle resolves once the match has `capacity` players.
    pub fn register_player(&self, player: &PlayerId) -> Result<FillHandle> {
        let rx = self.inner.lock().register(player.clone())?;
        Ok(FillHandle { rx })
    }

    /// Remove a player (disconnect).
    ///
    /// Fails with `NotRegistered`. A round in progress resolves to
    /// [`RoundOutcome::Abandoned`](super::RoundOutcome::Abandoned) for every
    /// waiter; a pending rematch vote resolves to `Declined`.
    pub fn unregister_player(&self, player: &PlayerId) -> Result<()> {
        self.inner.lock().unregister(player)
    }

    /// Submit this round's guess.
    ///
    /// `guess` is validated and lowercased here; callers may pre-validate
    /// with [`Word::parse`]. Fails with `NotRegistered`, `NotReady`,
    /// `MatchFinished`, `AlreadySubmitted`, `InvalidGuess` or
    /// `RepeatedGuess`. The returned handle resolves once every player has
    /// submitted this round.
    pub fn submit_word(&self, player: &PlayerId, guess: &str) -> Result<RoundHandle> {
        let mut state = self.inner.lock();
        let (rx, round) = state.submit(player, guess)?;
        let timeout = state.config().round_timeout;
        Ok(RoundHandle::new(rx, round, timeout, Arc::downgrade(&self.inner)))
    }

    /// Vote yes for a rematch.
    ///
    /// Fails with `NotFinished`, `NotRegistered` or `AlreadyVoted`. The
    /// handle resolves to `Accepted` once every player voted yes (the match
    /// is then back in progress with an empty history), or to `Declined`
    /// as soon as anyone votes no or leaves.
    pub fn rematch(&self, player: &PlayerId) -> Result<RematchHandle> {
        let rx = self.inner.lock().rematch(player)?;
        Ok(RematchHandle::new(rx))
    }

    /// Vote no for a rematch. Settles the vote as `Declined` for everyone.
    pub fn decline_rematch(&self, player: &PlayerId) -> Result<()> {
        self.inner.lock().decline_rematch(player)
    }

    /// The other player of a two-player match.
    ///
    /// `None` while the seat is empty, or when the match is not a
    /// two-player match; use [`Match::opponents`] for larger parties.
    pub fn opponent(&self, player: &PlayerId) -> Result<Option<PlayerId>> {
        let state = self.inner.lock();
        let mut others = state.opponents(player)?;
        if state.capacity() == 2 && others.len() == 1 {
            Ok(others.pop())
        } else {
            Ok(None)
        }
    }

    /// Every other registered player, in registration order.
    pub fn opponents(&self, player: &PlayerId) -> Result<Vec<PlayerId>> {
        self.inner.lock().opponents(player)
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> MatchId {
        self.inner.lock().id()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.inner.lock().status()
    }

    #[must_use]
    pub fn number_of_players(&self) -> usize {
        self.inner.lock().players().len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.inner.lock().is_full()
    }

    /// Finished with the rematch declined.
    #[must_use]
    pub fn is_disbanded(&self) -> bool {
        self.inner.lock().is_disbanded()
    }

    /// Registered players, in registration order.
    #[must_use]
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.inner.lock().players().to_vec()
    }

    #[must_use]
    pub fn contains(&self, player: &PlayerId) -> bool {
        self.inner.lock().players().contains(player)
    }

    /// Every word revealed since the match (re)started.
    ///
    /// The copy is O(1) and unaffected by later rounds.
    #[must_use]
    pub fn previous_guesses(&self) -> ImHashSet<Word> {
        self.inner.lock().previous_guesses().clone()
    }

    /// Completed rounds since the match (re)started.
    #[must_use]
    pub fn rounds_played(&self) -> u64 {
        self.inner.lock().rounds_played()
    }

    #[must_use]
    pub fn total_guesses_submitted(&self) -> u64 {
        self.inner.lock().total_guesses_submitted()
    }

    /// Guesses received in the round in progress.
    #[must_use]
    pub fn round_guess_count(&self) -> usize {
        self.inner.lock().round_guess_count()
    }

    /// A consistent view of the whole match, taken under one lock.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        let state = self.inner.lock();
        MatchSnapshot {
            id: state.id(),
            capacity: state.capacity(),
            status: state.status(),
            players: state.players().to_vec(),
            previous_guesses: state.previous_guesses().clone(),
            round: state.round_number(),
            round_guess_count: state.round_guess_count(),
            rounds_played: state.rounds_played(),
            total_guesses_submitted: state.total_guesses_submitted(),
            rematch_votes: state.rematch_votes(),
        }
    }
}

/// Pending "match is full" notification from [`Match::register_player`].
#[derive(Debug)]
#[must_use = "a fill handle does nothing unless waited on"]
pub struct FillHandle {
    rx: WaitHandle<()>,
}

impl FillHandle {
    /// Wait until the match has `capacity` players.
    ///
    /// Fails with a closed-gate error if the player left first.
    pub async fn wait(self) -> Result<()> {
        Ok(self.rx.await?)
    }
}

/// Point-in-time copy of a match, suitable for JSON responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub id: MatchId,
    pub capacity: usize,
    pub status: MatchStatus,
    pub players: Vec<PlayerId>,
    pub previous_guesses: ImHashSet<Word>,
    pub round: u32,
    pub round_guess_count: usize,
    pub rounds_played: u64,
    pub total_guesses_submitted: u64,
    pub rematch_votes: usize,
}
