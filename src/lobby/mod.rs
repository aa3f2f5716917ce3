//! Matchmaking lobby.
//!
//! The lobby owns the process-wide `PlayerId → Match` table and the queue
//! of matches with free seats. Assigning a player is atomic with respect
//! to concurrent joins: the table lock is held while the player is
//! registered in the match, so one id can never land in two matches.
//!
//! Lock order is always lobby, then match.

use std::collections::VecDeque;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::core::{MatchConfig, PlayerId};
use crate::error::{MatchError, Result};
use crate::matches::{FillHandle, Match, MatchId, MatchStatus, RematchHandle};

#[derive(Debug)]
struct LobbyState {
    /// Which match each player is in.
    assignments: FxHashMap<PlayerId, Match>,

    /// Matches with a free seat, oldest first.
    open: VecDeque<Match>,

    next_id: u64,
}

impl LobbyState {
    /// Front of the open queue that can still take a player.
    fn open_match(&mut self) -> Option<Match> {
        while let Some(front) = self.open.front() {
            if front.is_full() || front.is_disbanded() {
                self.open.pop_front();
            } else {
                return Some(front.clone());
            }
        }
        None
    }

    fn create_match(&mut self, config: &MatchConfig) -> Match {
        self.next_id += 1;
        let game = Match::new(MatchId::new(self.next_id), config.clone());
        self.open.push_back(game.clone());
        info!(match_id = %game.id(), capacity = config.capacity, "match created");
        game
    }

    fn forget_match(&mut self, id: MatchId) -> usize {
        let before = self.assignments.len();
        self.assignments.retain(|_, game| game.id() != id);
        self.open.retain(|game| game.id() != id);
        before - self.assignments.len()
    }
}

/// Matchmaking service that seats players into matches.
///
/// ```
/// use word_match::core::{MatchConfig, PlayerId};
/// use word_match::lobby::Lobby;
///
/// let lobby = Lobby::new(MatchConfig::default());
/// let bob = PlayerId::parse("Bob").unwrap();
/// let jack = PlayerId::parse("Jack").unwrap();
///
/// let (game, _ready) = lobby.join(&bob).unwrap();
/// let (same, _ready) = lobby.join(&jack).unwrap();
/// assert!(game.same_match(&same));
/// assert_eq!(game.opponent(&bob).unwrap(), Some(jack));
/// ```
#[derive(Debug)]
pub struct Lobby {
    config: MatchConfig,
    state: Mutex<LobbyState>,
}

impl Lobby {
    /// Create a lobby whose matches all use `config`.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LobbyState {
                assignments: FxHashMap::default(),
                open: VecDeque::new(),
                next_id: 0,
            }),
        }
    }

    /// The config every new match is created with.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Seat a player in the oldest match with a free seat, creating one if
    /// needed.
    ///
    /// Fails with `DuplicatePlayer` if the player is already seated in a
    /// live match. A seat in a disbanded match is released first.
    pub fn join(&self, player: &PlayerId) -> Result<(Match, FillHandle)> {
        let mut state = self.state.lock();

        if let Some(current) = state.assignments.get(player) {
            if !current.is_disbanded() {
                return Err(MatchError::DuplicatePlayer(player.clone()));
            }
            debug!(player = %player, match_id = %current.id(), "releasing seat in disbanded match");
            state.assignments.remove(player);
        }

        let game = match state.open_match() {
            Some(game) => game,
            None => state.create_match(&self.config),
        };
        let ready = game.register_player(player)?;
        state.assignments.insert(player.clone(), game.clone());

        debug!(
            player = %player,
            match_id = %game.id(),
            players = game.number_of_players(),
            "player seated"
        );
        Ok((game, ready))
    }

    /// The match a player is seated in.
    #[must_use]
    pub fn match_for(&self, player: &PlayerId) -> Option<Match> {
        self.state.lock().assignments.get(player).cloned()
    }

    /// Take a player out of their match (disconnect).
    ///
    /// A match left with players and a free seat goes back on the open
    /// queue; a finished match is disbanded.
    pub fn leave(&self, player: &PlayerId) -> Result<()> {
        let mut state = self.state.lock();
        let game = state
            .assignments
            .get(player)
            .cloned()
            .ok_or_else(|| MatchError::NotRegistered(player.clone()))?;

        game.unregister_player(player)?;
        state.assignments.remove(player);

        let id = game.id();
        if game.status() == MatchStatus::Finished || game.number_of_players() == 0 {
            let released = state.forget_match(id);
            info!(match_id = %id, released, "match disbanded");
        } else if !state.open.iter().any(|open| open.same_match(&game)) {
            debug!(match_id = %id, "match reopened for a replacement");
            state.open.push_back(game);
        }
        Ok(())
    }

    /// Vote yes for a rematch in the player's match.
    pub fn rematch(&self, player: &PlayerId) -> Result<RematchHandle> {
        self.seated(player)?.rematch(player)
    }

    /// Vote no for a rematch and disband the player's match.
    pub fn decline_rematch(&self, player: &PlayerId) -> Result<()> {
        let mut state = self.state.lock();
        let game = state
            .assignments
            .get(player)
            .cloned()
            .ok_or_else(|| MatchError::NotRegistered(player.clone()))?;

        game.decline_rematch(player)?;
        let released = state.forget_match(game.id());
        info!(match_id = %game.id(), released, "match disbanded");
        Ok(())
    }

    /// Release every seat in a match.
    ///
    /// Returns how many players were unseated.
    pub fn disband(&self, id: MatchId) -> usize {
        let released = self.state.lock().forget_match(id);
        info!(match_id = %id, released, "match disbanded");
        released
    }

    /// Number of seated players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.state.lock().assignments.len()
    }

    /// The match the next joining player would be seated in, if any.
    #[must_use]
    pub fn open_match(&self) -> Option<Match> {
        self.state.lock().open_match()
    }

    fn seated(&self, player: &PlayerId) -> Result<Match> {
        self.match_for(player)
            .ok_or_else(|| MatchError::NotRegistered(player.clone()))
    }
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
