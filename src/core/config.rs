//! Match configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration shared by every match a lobby creates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of players needed to fill a match.
    pub capacity: usize,

    /// How long a submitted guess waits for the rest of the round.
    /// `None` waits forever.
    pub round_timeout: Option<Duration>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            capacity: 2,
            round_timeout: None,
        }
    }
}

impl MatchConfig {
    /// Create a config for matches of `capacity` players.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Must have at least 1 player");
        Self {
            capacity,
            round_timeout: None,
        }
    }

    /// Set the party size.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Must have at least 1 player");
        self.capacity = capacity;
        self
    }

    /// Force-resolve rounds that stay incomplete for `timeout`.
    #[must_use]
    pub fn with_round_timeout(mut self, timeout: Duration) -> Self {
        self.round_timeout = Some(timeout);
        self
    }
}
