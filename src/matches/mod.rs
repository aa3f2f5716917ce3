//! Match coordination.
//!
//! A [`Match`] groups `capacity` players. Once full, every round collects
//! one word per player and resolves for all of them at once; identical
//! words end the match, after which a unanimous rematch vote restarts it.
//!
//! ## Rendezvous points
//!
//! | Operation         | Waits until                                  |
//! |-------------------|----------------------------------------------|
//! | `register_player` | the match is full                            |
//! | `submit_word`     | every player submitted this round            |
//! | `rematch`         | every player voted yes, or anyone voted no   |
//!
//! Each is backed by a [`RendezvousGate`](crate::gate::RendezvousGate).
//!
//! ## Policies
//!
//! - Guesses in a result follow registration order.
//! - A player leaving mid-round abandons the round for everyone
//!   ([`RoundOutcome::Abandoned`]); the match then waits for a replacement.
//! - Submitting into a finished match is rejected until a rematch is accepted.
//! - Words join the history when revealed, so two players may submit the
//!   same word in one round; that is a match, not a repeat.
//!
//! ## Example
//!
//! ```
//! use word_match::core::{MatchConfig, PlayerId};
//! use word_match::matches::{Match, MatchId, MatchStatus};
//!
//! # tokio_test::block_on(async {
//! let game = Match::new(MatchId::new(1), MatchConfig::default());
//! let bob = PlayerId::parse("Bob").unwrap();
//! let jack = PlayerId::parse("Jack").unwrap();
//!
//! let _ = game.register_player(&bob).unwrap();
//! let ready = game.register_player(&jack).unwrap();
//! ready.wait().await.unwrap();
//!
//! let first = game.submit_word(&bob, "Cat").unwrap();
//! let second = game.submit_word(&jack, "cat").unwrap();
//!
//! let outcome = first.wait().await.unwrap();
//! assert!(outcome.is_match());
//! assert_eq!(second.wait().await.unwrap(), outcome);
//! assert_eq!(game.status(), MatchStatus::Finished);
//! # });
//! ```

mod engine;
mod rematch;
mod round;
mod state;

pub use engine::{FillHandle, Match, MatchSnapshot};
pub use rematch::{RematchDecision, RematchHandle};
pub use round::{check_for_match, Guess, RoundHandle, RoundOutcome, RoundResult};

use serde::{Deserialize, Serialize};

/// Unique identifier for a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl MatchId {
    /// Create a new match ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Match({})", self.0)
    }
}

/// Where a match is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Rounds are being played (or the match is still filling).
    InProgress,
    /// A round matched; waiting for the rematch vote.
    Finished,
}
