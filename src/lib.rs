//! # word-match
//!
//! Match coordination engine for a multi-player word-matching game.
//!
//! Players are grouped into matches of `capacity` players. Each round every
//! player submits one word; when the last word arrives the round resolves
//! for everyone at once and reports whether all words were identical. A
//! match ends on the first identical round, and a unanimous rematch vote
//! starts it over.
//!
//! ## Design Principles
//!
//! 1. **N-Player First**: `capacity` is a parameter, not an assumption.
//!    Two-player conveniences (`opponent`) sit on top of N-player ones.
//!
//! 2. **Rendezvous, not polling**: every "wait until all players did X"
//!    point is a [`RendezvousGate`] that releases all waiters together.
//!
//! 3. **Validated at the edge**: [`PlayerId`] and [`Word`] check their
//!    format once at construction; the engine never sees malformed input.
//!
//! ## Modules
//!
//! - `core`: player ids, words, configuration
//! - `gate`: the one-shot N-party barrier
//! - `matches`: the match state machine and its wait handles
//! - `lobby`: the matchmaking service seating players into matches
//! - `error`: the error taxonomy

pub mod core;
pub mod gate;
pub mod matches;
pub mod lobby;
pub mod error;

// Re-export commonly used types
pub use crate::core::{MatchConfig, PlayerId, Word};

pub use crate::gate::{GateError, RendezvousGate, Ticket, WaitHandle};

pub use crate::matches::{
    check_for_match, FillHandle, Guess, Match, MatchId, MatchSnapshot, MatchStatus,
    RematchDecision, RematchHandle, RoundHandle, RoundOutcome, RoundResult,
};

pub use crate::lobby::Lobby;

pub use crate::error::{MatchError, Result};
