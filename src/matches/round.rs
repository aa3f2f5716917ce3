//! Rounds: buffered guesses, results, and the round wait handle.
//!
//! A round collects exactly one word from every player. When the last word
//! arrives the round resolves for everyone at once; the words are revealed
//! together and only then join the match's guess history.

use std::sync::Weak;
use std::time::Duration;

use im::HashSet as ImHashSet;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{PlayerId, Word};
use crate::error::Result;
use crate::gate::WaitHandle;

use super::state::MatchState;

/// One player's revealed guess.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    pub player: PlayerId,
    pub word: Word,
}

/// Result of a completed round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round number within the current match cycle (starts at 1).
    pub round: u32,

    /// True iff every player submitted the same word.
    pub is_match: bool,

    /// Every player's guess, in registration order.
    pub guesses: SmallVec<[Guess; 2]>,

    /// Completed rounds so far, this one included.
    pub rounds_played: u64,
}

impl RoundResult {
    /// The shared word, if the round was a match.
    #[must_use]
    pub fn matching_word(&self) -> Option<&Word> {
        if self.is_match {
            self.guesses.first().map(|g| &g.word)
        } else {
            None
        }
    }

    /// The submitted words, in registration order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.guesses.iter().map(|g| &g.word)
    }

    /// The word `player` submitted this round.
    #[must_use]
    pub fn guess_of(&self, player: &PlayerId) -> Option<&Word> {
        self.guesses
            .iter()
            .find(|g| &g.player == player)
            .map(|g| &g.word)
    }
}

/// How a round ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Every player submitted; the words were compared.
    Completed(RoundResult),

    /// A player left mid-round. The words were discarded.
    Abandoned { player: PlayerId },

    /// The round timeout elapsed first. The words were discarded.
    TimedOut { round: u32 },
}

impl RoundOutcome {
    /// The result, if the round completed.
    #[must_use]
    pub fn result(&self) -> Option<&RoundResult> {
        match self {
            RoundOutcome::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// True iff the round completed with every word equal.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.result().is_some_and(|r| r.is_match)
    }
}

/// True iff every word equals the first. An empty round never matches.
///
/// ```
/// use word_match::core::Word;
/// use word_match::matches::check_for_match;
///
/// let cat = Word::parse("cat").unwrap();
/// let dog = Word::parse("dog").unwrap();
/// assert!(check_for_match([&cat, &cat]));
/// assert!(!check_for_match([&cat, &cat, &dog]));
/// ```
pub fn check_for_match<'a>(words: impl IntoIterator<Item = &'a Word>) -> bool {
    let mut words = words.into_iter();
    match words.next() {
        Some(first) => words.all(|w| w == first),
        None => false,
    }
}

/// Guesses buffered for the round in progress.
#[derive(Clone, Debug)]
pub(crate) struct Round {
    /// Round number within the current match cycle.
    number: u32,

    /// Current guess per player; a missing entry is "no guess yet".
    guesses: FxHashMap<PlayerId, Word>,
}

impl Round {
    pub(crate) fn new() -> Self {
        Self {
            number: 1,
            guesses: FxHashMap::default(),
        }
    }

    pub(crate) fn number(&self) -> u32 {
        self.number
    }

    /// Submissions received this round.
    pub(crate) fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    pub(crate) fn has_guessed(&self, player: &PlayerId) -> bool {
        self.guesses.contains_key(player)
    }

    pub(crate) fn record(&mut self, player: PlayerId, word: Word) {
        self.guesses.insert(player, word);
    }

    pub(crate) fn forget(&mut self, player: &PlayerId) {
        self.guesses.remove(player);
    }

    /// Compare the buffered guesses, reveal them into `history`, and advance
    /// to the next round.
    pub(crate) fn conclude(
        &mut self,
        order: &[PlayerId],
        history: &mut ImHashSet<Word>,
        rounds_played: u64,
    ) -> RoundResult {
        let guesses: SmallVec<[Guess; 2]> = order
            .iter()
            .filter_map(|player| {
                self.guesses.remove(player).map(|word| Guess {
                    player: player.clone(),
                    word,
                })
            })
            .collect();

        let is_match = check_for_match(guesses.iter().map(|g| &g.word));
        for guess in &guesses {
            history.insert(guess.word.clone());
        }

        let result = RoundResult {
            round: self.number,
            is_match,
            guesses,
            rounds_played,
        };
        self.advance();
        result
    }

    /// Drop the buffered guesses without revealing them.
    pub(crate) fn discard(&mut self) {
        self.advance();
    }

    /// Start the next cycle at round 1 (after a rematch).
    pub(crate) fn restart(&mut self) {
        self.guesses.clear();
        self.number = 1;
    }

    fn advance(&mut self) {
        self.guesses.clear();
        self.number += 1;
    }
}

/// Pending result of one submitted guess.
///
/// Resolves once every player has submitted this round, or when the round
/// is abandoned or times out.
#[derive(Debug)]
#[must_use = "a round handle does nothing unless waited on"]
pub struct RoundHandle {
    rx: WaitHandle<RoundOutcome>,
    round: u32,
    timeout: Option<Duration>,
    state: Weak<Mutex<MatchState>>,
}

impl RoundHandle {
    pub(crate) fn new(
        rx: WaitHandle<RoundOutcome>,
        round: u32,
        timeout: Option<Duration>,
        state: Weak<Mutex<MatchState>>,
    ) -> Self {
        Self {
            rx,
            round,
            timeout,
            state,
        }
    }

    /// The round this guess was submitted in.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Wait for the round to resolve.
    ///
    /// With a round timeout configured, the first waiter whose timeout
    /// elapses resolves the whole round to [`RoundOutcome::TimedOut`].
    pub async fn wait(mut self) -> Result<RoundOutcome> {
        let Some(timeout) = self.timeout else {
            return Ok(self.rx.await?);
        };

        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(outcome) => Ok(outcome?),
            Err(_) => {
                if let Some(state) = self.state.upgrade() {
                    let expired = state.lock().expire_round(self.round);
                    debug!(round = self.round, expired, "round wait timed out");
                }
                Ok((&mut self.rx).await?)
            }
        }
    }
}
