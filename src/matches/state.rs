//! Match state machine.
//!
//! `MatchState` is the single-lock interior of a [`Match`](super::Match).
//! Every operation validates fully before mutating, so a rejected call
//! leaves the state untouched. Gate releases happen inside the same
//! critical section as the arrival that triggers them.

use im::HashSet as ImHashSet;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::core::{MatchConfig, PlayerId, Word};
use crate::error::{MatchError, Result};
use crate::gate::{GateError, RendezvousGate, Ticket, WaitHandle};

use super::rematch::{RematchDecision, RematchVotes};
use super::round::{Round, RoundOutcome};
use super::{MatchId, MatchStatus};

/// Gate calls inside a match can only fail if the match itself broke the
/// gate contract. Crash in debug builds, surface the error in release.
fn armed<T>(result: std::result::Result<T, GateError>) -> Result<T> {
    debug_assert!(
        result.is_ok(),
        "match violated the gate contract: {:?}",
        result.as_ref().err()
    );
    Ok(result?)
}

#[derive(Debug)]
pub(crate) struct MatchState {
    id: MatchId,
    config: MatchConfig,
    status: MatchStatus,

    /// Registered players, in registration order.
    players: Vec<PlayerId>,

    round: Round,

    /// Every word revealed since the match (re)started.
    previous_guesses: ImHashSet<Word>,

    /// Individual submissions since the match (re)started.
    total_guesses_submitted: u64,

    /// Completed rounds since the match (re)started.
    rounds_played: u64,

    votes: RematchVotes,

    /// Released when the match is full.
    fill_gate: RendezvousGate<()>,
    fill_tickets: FxHashMap<PlayerId, Ticket>,

    /// Released when every player has submitted; re-armed right after.
    round_gate: RendezvousGate<RoundOutcome>,

    /// Released on a unanimous yes, or forced on a no.
    rematch_gate: RendezvousGate<RematchDecision>,
}

impl MatchState {
    pub(crate) fn new(id: MatchId, config: MatchConfig) -> Self {
        let capacity = config.capacity;
        Self {
            id,
            config,
            status: MatchStatus::InProgress,
            players: Vec::with_capacity(capacity),
            round: Round::new(),
            previous_guesses: ImHashSet::new(),
            total_guesses_submitted: 0,
            rounds_played: 0,
            votes: RematchVotes::default(),
            fill_gate: RendezvousGate::new(capacity),
            fill_tickets: FxHashMap::default(),
            round_gate: RendezvousGate::new(capacity),
            rematch_gate: RendezvousGate::new(capacity),
        }
    }

    // === Accessors ===

    pub(crate) fn id(&self) -> MatchId {
        self.id
    }

    pub(crate) fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub(crate) fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub(crate) fn status(&self) -> MatchStatus {
        self.status
    }

    pub(crate) fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub(crate) fn is_full(&self) -> bool {
        self.players.len() == self.capacity()
    }

    pub(crate) fn previous_guesses(&self) -> &ImHashSet<Word> {
        &self.previous_guesses
    }

    pub(crate) fn total_guesses_submitted(&self) -> u64 {
        self.total_guesses_submitted
    }

    pub(crate) fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    pub(crate) fn round_number(&self) -> u32 {
        self.round.number()
    }

    pub(crate) fn round_guess_count(&self) -> usize {
        self.round.guess_count()
    }

    pub(crate) fn rematch_votes(&self) -> usize {
        self.votes.count()
    }

    /// Finished and the rematch was declined: nothing more can happen here.
    pub(crate) fn is_disbanded(&self) -> bool {
        self.status == MatchStatus::Finished && self.votes.is_declined()
    }

    fn ensure_registered(&self, player: &PlayerId) -> Result<usize> {
        self.players
            .iter()
            .position(|p| p == player)
            .ok_or_else(|| MatchError::NotRegistered(player.clone()))
    }

    // === Membership ===

    pub(crate) fn register(&mut self, player: PlayerId) -> Result<WaitHandle<()>> {
        if self.players.contains(&player) {
            return Err(MatchError::DuplicatePlayer(player));
        }
        if self.is_disbanded() {
            return Err(MatchError::MatchDisbanded(player));
        }
        if self.is_full() {
            return Err(MatchError::MatchFull {
                player,
                capacity: self.capacity(),
            });
        }

        let handle = armed(self.fill_gate.arrive(|| ()))?;
        self.fill_tickets.insert(player.clone(), handle.ticket());
        self.players.push(player);

        info!(
            match_id = %self.id,
            player = %self.players[self.players.len() - 1],
            players = self.players.len(),
            capacity = self.capacity(),
            "player registered"
        );
        if self.fill_gate.is_released() {
            info!(match_id = %self.id, "match full");
        }
        Ok(handle)
    }

    /// Remove a player.
    ///
    /// A pending round is abandoned, a finished match's rematch is declined,
    /// and the fill gate waits for a replacement.
    pub(crate) fn unregister(&mut self, player: &PlayerId) -> Result<()> {
        let index = self.ensure_registered(player)?;
        let was_full = self.fill_gate.is_released();
        let mid_round = self.status == MatchStatus::InProgress && self.round.guess_count() > 0;

        self.players.remove(index);
        self.round.forget(player);
        self.votes.remove(player);
        let ticket = self.fill_tickets.remove(player);

        if was_full {
            self.rearm_fill_gate()?;
        } else if let Some(ticket) = ticket {
            self.fill_gate.withdraw(ticket);
        }

        if mid_round {
            self.abort_round(RoundOutcome::Abandoned {
                player: player.clone(),
            })?;
        }
        if self.status == MatchStatus::Finished {
            self.settle_declined()?;
        }

        info!(
            match_id = %self.id,
            player = %player,
            players = self.players.len(),
            "player unregistered"
        );
        Ok(())
    }

    /// Re-arm the fill gate after a full match lost a player. Remaining
    /// players are counted as arrived; nobody waits on their handles.
    fn rearm_fill_gate(&mut self) -> Result<()> {
        armed(self.fill_gate.reset())?;
        self.fill_tickets.clear();
        for player in &self.players {
            let handle = armed(self.fill_gate.arrive(|| ()))?;
            self.fill_tickets.insert(player.clone(), handle.ticket());
        }
        Ok(())
    }

    // === Rounds ===

    /// Buffer one guess and arrive at the round gate.
    ///
    /// Returns the wait handle and the round number it belongs to.
    pub(crate) fn submit(
        &mut self,
        player: &PlayerId,
        raw: &str,
    ) -> Result<(WaitHandle<RoundOutcome>, u32)> {
        self.ensure_registered(player)?;
        if self.status == MatchStatus::Finished {
            return Err(MatchError::MatchFinished(player.clone()));
        }
        if !self.is_full() {
            return Err(MatchError::NotReady {
                player: player.clone(),
                players: self.players.len(),
                capacity: self.capacity(),
            });
        }
        if self.round.has_guessed(player) {
            return Err(MatchError::AlreadySubmitted(player.clone()));
        }
        let word = Word::parse(raw)?;
        if self.previous_guesses.contains(&word) {
            return Err(MatchError::RepeatedGuess {
                player: player.clone(),
                word,
            });
        }

        let round_number = self.round.number();
        debug!(match_id = %self.id, player = %player, round = round_number, "guess submitted");
        self.round.record(player.clone(), word);
        self.total_guesses_submitted += 1;

        let round = &mut self.round;
        let order = &self.players;
        let history = &mut self.previous_guesses;
        let status = &mut self.status;
        let rounds_played = &mut self.rounds_played;
        let handle = armed(self.round_gate.arrive(|| {
            *rounds_played += 1;
            let result = round.conclude(order, history, *rounds_played);
            if result.is_match {
                *status = MatchStatus::Finished;
            }
            RoundOutcome::Completed(result)
        }))?;

        if self.round_gate.is_released() {
            armed(self.round_gate.reset())?;
            info!(
                match_id = %self.id,
                round = round_number,
                is_match = self.status == MatchStatus::Finished,
                rounds_played = self.rounds_played,
                "round resolved"
            );
        } else {
            debug!(
                match_id = %self.id,
                round = round_number,
                waiting_for = self.round_gate.remaining(),
                "waiting for remaining guesses"
            );
        }

        Ok((handle, round_number))
    }

    /// Time out `round` if it is still the one in progress.
    pub(crate) fn expire_round(&mut self, round: u32) -> bool {
        if self.status != MatchStatus::InProgress
            || self.round.number() != round
            || self.round.guess_count() == 0
        {
            return false;
        }
        self.abort_round(RoundOutcome::TimedOut { round }).is_ok()
    }

    /// Resolve every waiter of the current round with `outcome` and discard
    /// the buffered guesses.
    fn abort_round(&mut self, outcome: RoundOutcome) -> Result<()> {
        let round = self.round.number();
        let released = armed(self.round_gate.force_release(outcome))?;
        armed(self.round_gate.reset())?;
        self.round.discard();
        warn!(match_id = %self.id, round, released, "round aborted");
        Ok(())
    }

    // === Rematch ===

    pub(crate) fn rematch(&mut self, player: &PlayerId) -> Result<WaitHandle<RematchDecision>> {
        if self.status != MatchStatus::Finished {
            return Err(MatchError::NotFinished(player.clone()));
        }
        self.ensure_registered(player)?;
        if self.votes.is_declined() {
            return Ok(WaitHandle::ready(RematchDecision::Declined));
        }
        if self.votes.has_voted(player) {
            return Err(MatchError::AlreadyVoted(player.clone()));
        }

        let handle = armed(self.rematch_gate.arrive(|| RematchDecision::Accepted))?;
        self.votes.vote_yes(player.clone());

        if self.rematch_gate.is_released() {
            self.restart()?;
        } else {
            debug!(
                match_id = %self.id,
                player = %player,
                votes = self.votes.count(),
                "rematch vote recorded"
            );
        }
        Ok(handle)
    }

    pub(crate) fn decline_rematch(&mut self, player: &PlayerId) -> Result<()> {
        if self.status != MatchStatus::Finished {
            return Err(MatchError::NotFinished(player.clone()));
        }
        self.ensure_registered(player)?;
        self.settle_declined()
    }

    /// Resolve pending yes-votes to `Declined`; later votes resolve the same.
    fn settle_declined(&mut self) -> Result<()> {
        if self.votes.is_declined() {
            return Ok(());
        }
        if self.rematch_gate.arrived() > 0 {
            armed(self.rematch_gate.force_release(RematchDecision::Declined))?;
            armed(self.rematch_gate.reset())?;
        }
        self.votes.decline();
        info!(match_id = %self.id, "rematch declined");
        Ok(())
    }

    /// Unanimous yes: clear history and counters, play on.
    fn restart(&mut self) -> Result<()> {
        armed(self.rematch_gate.reset())?;
        self.votes.clear();
        self.previous_guesses = ImHashSet::new();
        self.total_guesses_submitted = 0;
        self.rounds_played = 0;
        self.round.restart();
        if self.round_gate.is_released() {
            armed(self.round_gate.reset())?;
        }
        self.status = MatchStatus::InProgress;
        info!(match_id = %self.id, "rematch accepted");
        Ok(())
    }

    // === Opponents ===

    pub(crate) fn opponents(&self, player: &PlayerId) -> Result<Vec<PlayerId>> {
        self.ensure_registered(player)?;
        Ok(self
            .players
            .iter()
            .filter(|p| *p != player)
            .cloned()
            .collect())
    }
}
