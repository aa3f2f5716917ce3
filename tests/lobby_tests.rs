//! Lobby (matchmaking) tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use word_match::core::{MatchConfig, PlayerId};
use word_match::error::MatchError;
use word_match::lobby::Lobby;
use word_match::matches::{MatchStatus, RematchDecision};

fn player(s: &str) -> PlayerId {
    PlayerId::parse(s).unwrap()
}

/// Players are paired in arrival order.
#[tokio::test]
async fn test_players_paired_in_order() {
    let lobby = Lobby::default();
    let ids: Vec<_> = ["a", "b", "c", "d"].iter().map(|s| player(s)).collect();

    let mut matches = Vec::new();
    let mut ready = Vec::new();
    for id in &ids {
        let (game, handle) = lobby.join(id).unwrap();
        matches.push(game);
        ready.push(handle);
    }
    for handle in ready {
        handle.wait().await.unwrap();
    }

    assert!(matches[0].same_match(&matches[1]));
    assert!(matches[2].same_match(&matches[3]));
    assert!(!matches[0].same_match(&matches[2]));
    assert_eq!(matches[0].opponent(&ids[0]).unwrap(), Some(ids[1].clone()));
    assert_eq!(lobby.player_count(), 4);
    assert!(lobby.open_match().is_none());
}

/// Every match the lobby creates uses the lobby's config.
#[test]
fn test_matches_use_lobby_config() {
    let config = MatchConfig::new(3).with_round_timeout(Duration::from_secs(20));
    let lobby = Lobby::new(config.clone());
    assert_eq!(lobby.config(), &config);

    let (game, _) = lobby.join(&player("Bob")).unwrap();
    assert_eq!(game.capacity(), lobby.config().capacity);
    let _ = lobby.join(&player("Jack")).unwrap();
    assert!(!game.is_full());
    let _ = lobby.join(&player("Lucy")).unwrap();
    assert!(game.is_full());
}

/// A seated player cannot join again.
#[test]
fn test_duplicate_join_rejected() {
    let lobby = Lobby::default();
    let bob = player("Bob");

    let (game, _ready) = lobby.join(&bob).unwrap();
    assert_eq!(
        lobby.join(&bob).unwrap_err(),
        MatchError::DuplicatePlayer(bob.clone())
    );
    assert_eq!(game.number_of_players(), 1);
    assert!(lobby.match_for(&bob).unwrap().same_match(&game));
}

/// Leaving frees the seat for the next player.
#[test]
fn test_leave_reopens_seat() {
    let lobby = Lobby::default();
    let bob = player("Bob");
    let jack = player("Jack");
    let (game, _) = lobby.join(&bob).unwrap();
    let _ = lobby.join(&jack).unwrap();
    assert!(lobby.open_match().is_none());

    lobby.leave(&jack).unwrap();
    assert!(lobby.match_for(&jack).is_none());
    assert!(lobby.open_match().unwrap().same_match(&game));

    let (replacement, _) = lobby.join(&player("Mia")).unwrap();
    assert!(replacement.same_match(&game));
    assert_eq!(
        lobby.leave(&jack).unwrap_err(),
        MatchError::NotRegistered(jack)
    );
}

/// The last player out closes the match.
#[test]
fn test_empty_match_is_dropped() {
    let lobby = Lobby::default();
    let bob = player("Bob");
    let _ = lobby.join(&bob).unwrap();

    lobby.leave(&bob).unwrap();

    assert!(lobby.open_match().is_none());
    assert_eq!(lobby.player_count(), 0);
}

/// Declining a rematch disbands the match and lets everyone join again.
#[tokio::test]
async fn test_decline_disbands() {
    let lobby = Lobby::default();
    let bob = player("Bob");
    let jack = player("Jack");
    let (game, _) = lobby.join(&bob).unwrap();
    let _ = lobby.join(&jack).unwrap();

    let a = game.submit_word(&bob, "cat").unwrap();
    let b = game.submit_word(&jack, "cat").unwrap();
    a.wait().await.unwrap();
    b.wait().await.unwrap();
    assert_eq!(game.status(), MatchStatus::Finished);

    let vote = lobby.rematch(&bob).unwrap();
    lobby.decline_rematch(&jack).unwrap();
    assert_eq!(vote.wait().await.unwrap(), RematchDecision::Declined);

    assert_eq!(lobby.player_count(), 0);
    let (next, _) = lobby.join(&bob).unwrap();
    assert!(!next.same_match(&game));
}

/// A player whose match was disbanded under them can join a new one.
#[tokio::test]
async fn test_rejoin_after_partner_leaves_finished_match() {
    let lobby = Lobby::default();
    let bob = player("Bob");
    let jack = player("Jack");
    let (game, _) = lobby.join(&bob).unwrap();
    let _ = lobby.join(&jack).unwrap();

    let a = game.submit_word(&bob, "sun").unwrap();
    let b = game.submit_word(&jack, "sun").unwrap();
    a.wait().await.unwrap();
    b.wait().await.unwrap();

    lobby.leave(&jack).unwrap();
    assert!(game.is_disbanded());

    let (next, _) = lobby.join(&bob).unwrap();
    assert!(!next.same_match(&game));
}

/// Concurrent joins never seat a player twice or overfill a match.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins() {
    let lobby = Arc::new(Lobby::new(MatchConfig::new(3)));

    let mut tasks = Vec::new();
    for i in 0..30 {
        for _attempt in 0..2 {
            let lobby = Arc::clone(&lobby);
            let id = player(&format!("p{}", i));
            tasks.push(tokio::spawn(async move { lobby.join(&id).map(|(game, _)| game) }));
        }
    }

    let mut joined = 0;
    let mut duplicates = 0;
    let mut games = Vec::new();
    for task in tasks {
        match task.await.unwrap() {
            Ok(game) => {
                joined += 1;
                games.push(game);
            }
            Err(MatchError::DuplicatePlayer(_)) => duplicates += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(joined, 30);
    assert_eq!(duplicates, 30);
    assert_eq!(lobby.player_count(), 30);

    let ids: HashSet<_> = games.iter().map(|g| g.id()).collect();
    assert_eq!(ids.len(), 10);
    for game in &games {
        assert!(game.is_full());
    }
}
