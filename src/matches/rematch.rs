//! Rematch voting.
//!
//! After a match result every player votes. Unanimous yes restarts the
//! match with a clean history; a single no (or a departure) settles the
//! vote as declined for everyone immediately.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::error::Result;
use crate::gate::WaitHandle;

/// Outcome of a rematch vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RematchDecision {
    /// Every player voted yes; the match restarted.
    Accepted,
    /// Someone voted no or left; the match should be torn down.
    Declined,
}

impl RematchDecision {
    /// True iff the players are playing again.
    #[must_use]
    pub fn play_again(self) -> bool {
        matches!(self, RematchDecision::Accepted)
    }
}

/// Pending result of one rematch vote.
#[derive(Debug)]
#[must_use = "a rematch handle does nothing unless waited on"]
pub struct RematchHandle {
    rx: WaitHandle<RematchDecision>,
}

impl RematchHandle {
    pub(crate) fn new(rx: WaitHandle<RematchDecision>) -> Self {
        Self { rx }
    }

    /// Wait until every player voted yes, or anyone voted no.
    pub async fn wait(self) -> Result<RematchDecision> {
        Ok(self.rx.await?)
    }
}

/// Yes-votes collected for the pending rematch.
#[derive(Clone, Debug, Default)]
pub(crate) struct RematchVotes {
    yes: FxHashSet<PlayerId>,
    declined: bool,
}

impl RematchVotes {
    pub(crate) fn has_voted(&self, player: &PlayerId) -> bool {
        self.yes.contains(player)
    }

    pub(crate) fn vote_yes(&mut self, player: PlayerId) {
        self.yes.insert(player);
    }

    pub(crate) fn count(&self) -> usize {
        self.yes.len()
    }

    pub(crate) fn is_declined(&self) -> bool {
        self.declined
    }

    pub(crate) fn decline(&mut self) {
        self.yes.clear();
        self.declined = true;
    }

    pub(crate) fn remove(&mut self, player: &PlayerId) {
        self.yes.remove(player);
    }

    pub(crate) fn clear(&mut self) {
        self.yes.clear();
        self.declined = false;
    }
}
