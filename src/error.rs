//! Error types for match coordination.
//!
//! Every rejection is local and synchronous: a call that returns an error
//! leaves the match exactly as it was. Each variant carries the offending
//! identifier so callers can render a specific message.

use crate::core::{PlayerId, Word};
use crate::gate::GateError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors raised by [`Match`](crate::Match) and [`Lobby`](crate::Lobby).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The player is already registered in this match (or lobby).
    #[error("{0} is already registered")]
    DuplicatePlayer(PlayerId),

    /// The match already has `capacity` players.
    #[error("cannot register {player}: match is full ({capacity} players)")]
    MatchFull { player: PlayerId, capacity: usize },

    /// The player is not registered.
    #[error("{0} is not registered")]
    NotRegistered(PlayerId),

    /// The word was already revealed in an earlier round of this match.
    #[error("{word} was already guessed in this match")]
    RepeatedGuess { player: PlayerId, word: Word },

    /// A rematch was requested before the match concluded.
    #[error("{0} cannot vote for a rematch: the match has not finished")]
    NotFinished(PlayerId),

    /// The guess is empty or contains something other than letters.
    #[error("invalid guess {0:?}: a guess must be a single word of letters")]
    InvalidGuess(String),

    /// The player identifier is empty or not alphanumeric.
    #[error("invalid player id {0:?}: ids must be non-empty and alphanumeric")]
    InvalidPlayerId(String),

    /// A guess was submitted before the match filled up.
    #[error("{player} cannot submit yet: {players} of {capacity} players registered")]
    NotReady {
        player: PlayerId,
        players: usize,
        capacity: usize,
    },

    /// A guess was submitted after a match result and before a rematch.
    #[error("{0} cannot submit: the match has finished, vote for a rematch first")]
    MatchFinished(PlayerId),

    /// The match finished and its rematch was declined; it takes no new players.
    #[error("cannot register {0}: the match was disbanded")]
    MatchDisbanded(PlayerId),

    /// The player already submitted a guess this round.
    #[error("{0} already submitted a guess this round")]
    AlreadySubmitted(PlayerId),

    /// The player already voted in this rematch.
    #[error("{0} already voted for a rematch")]
    AlreadyVoted(PlayerId),

    /// Internal gate contract violation.
    #[error(transparent)]
    Gate(#[from] GateError),
}

impl MatchError {
    /// The player the error is about, when there is one.
    #[must_use]
    pub fn player(&self) -> Option<&PlayerId> {
        match self {
            MatchError::DuplicatePlayer(p)
            | MatchError::NotRegistered(p)
            | MatchError::NotFinished(p)
            | MatchError::MatchFinished(p)
            | MatchError::MatchDisbanded(p)
            | MatchError::AlreadySubmitted(p)
            | MatchError::AlreadyVoted(p) => Some(p),
            MatchError::MatchFull { player, .. }
            | MatchError::RepeatedGuess { player, .. }
            | MatchError::NotReady { player, .. } => Some(player),
            MatchError::InvalidGuess(_) | MatchError::InvalidPlayerId(_) | MatchError::Gate(_) => {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_player() {
        let bob = PlayerId::parse("BobSmith").unwrap();
        let err = MatchError::DuplicatePlayer(bob.clone());
        assert_eq!(err.to_string(), "BobSmith is already registered");
        assert_eq!(err.player(), Some(&bob));

        let full = MatchError::MatchFull {
            player: bob.clone(),
            capacity: 2,
        };
        assert_eq!(
            full.to_string(),
            "cannot register BobSmith: match is full (2 players)"
        );
    }

    #[test]
    fn test_gate_error_is_transparent() {
        let err: MatchError = GateError::Reused.into();
        assert_eq!(err.to_string(), GateError::Reused.to_string());
        assert_eq!(err.player(), None);
    }
}
