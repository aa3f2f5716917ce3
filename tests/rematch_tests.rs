//! Rematch cycle tests.

use tokio_test::{assert_pending, assert_ready, task};

use word_match::core::{MatchConfig, PlayerId};
use word_match::error::MatchError;
use word_match::matches::{Match, MatchId, MatchStatus, RematchDecision};

fn player(s: &str) -> PlayerId {
    PlayerId::parse(s).unwrap()
}

/// A two-player match that has just produced a match on "cat" after one
/// miss on "sun"/"moon".
async fn finished_match() -> (Match, PlayerId, PlayerId) {
    let game = Match::new(MatchId::new(1), MatchConfig::default());
    let bob = player("BobSmith");
    let jack = player("JackJohn");
    let _ = game.register_player(&bob).unwrap();
    let _ = game.register_player(&jack).unwrap();

    for (a, b) in [("sun", "moon"), ("cat", "cat")] {
        let first = game.submit_word(&bob, a).unwrap();
        let second = game.submit_word(&jack, b).unwrap();
        first.wait().await.unwrap();
        second.wait().await.unwrap();
    }
    assert_eq!(game.status(), MatchStatus::Finished);
    (game, bob, jack)
}

/// Rematch before any result.
#[test]
fn test_rematch_requires_finished_match() {
    let game = Match::new(MatchId::new(1), MatchConfig::default());
    let bob = player("BobSmith");
    let _ = game.register_player(&bob).unwrap();

    let err = game.rematch(&bob).unwrap_err();
    assert_eq!(err, MatchError::NotFinished(bob.clone()));
    assert_eq!(
        game.decline_rematch(&bob).unwrap_err(),
        MatchError::NotFinished(bob)
    );
}

/// Rematch from a player outside the match.
#[tokio::test]
async fn test_rematch_requires_registration() {
    let (game, _bob, _jack) = finished_match().await;
    let lucy = player("LucyLove");

    assert_eq!(
        game.rematch(&lucy).unwrap_err(),
        MatchError::NotRegistered(lucy)
    );
}

/// Unanimous yes restarts the match with a clean slate.
#[tokio::test]
async fn test_rematch_cycle() {
    let (game, bob, jack) = finished_match().await;
    assert_eq!(game.rounds_played(), 2);
    assert_eq!(game.previous_guesses().len(), 3);

    let mut first = task::spawn(game.rematch(&bob).unwrap().wait());
    assert_pending!(first.poll());
    assert_eq!(game.status(), MatchStatus::Finished);

    let second = game.rematch(&jack).unwrap().wait().await.unwrap();
    assert_eq!(second, RematchDecision::Accepted);
    assert!(assert_ready!(first.poll()).unwrap().play_again());

    assert_eq!(game.status(), MatchStatus::InProgress);
    assert!(game.previous_guesses().is_empty());
    assert_eq!(game.rounds_played(), 0);
    assert_eq!(game.total_guesses_submitted(), 0);
    assert_eq!(game.snapshot().round, 1);

    // "cat" is allowed again, and counting resumes from one.
    let a = game.submit_word(&bob, "cat").unwrap();
    let b = game.submit_word(&jack, "dog").unwrap();
    let result = a.wait().await.unwrap();
    b.wait().await.unwrap();
    assert_eq!(result.result().unwrap().round, 1);
    assert_eq!(game.rounds_played(), 1);
}

/// Voting twice is rejected.
#[tokio::test]
async fn test_double_vote_rejected() {
    let (game, bob, _jack) = finished_match().await;

    let _pending = game.rematch(&bob).unwrap();
    assert_eq!(
        game.rematch(&bob).unwrap_err(),
        MatchError::AlreadyVoted(bob)
    );
    assert_eq!(game.snapshot().rematch_votes, 1);
}

/// A single no resolves pending yes-votes without waiting.
#[tokio::test]
async fn test_decline_short_circuits() {
    let (game, bob, jack) = finished_match().await;

    let mut yes = task::spawn(game.rematch(&bob).unwrap().wait());
    assert_pending!(yes.poll());

    game.decline_rematch(&jack).unwrap();

    assert!(yes.is_woken());
    assert_eq!(assert_ready!(yes.poll()).unwrap(), RematchDecision::Declined);
    assert_eq!(game.status(), MatchStatus::Finished);
    assert!(game.is_disbanded());
}

/// Votes after a decline resolve to declined immediately.
#[tokio::test]
async fn test_vote_after_decline() {
    let (game, bob, jack) = finished_match().await;

    game.decline_rematch(&bob).unwrap();
    let late = game.rematch(&jack).unwrap().wait().await.unwrap();

    assert_eq!(late, RematchDecision::Declined);
    assert!(!late.play_again());
    // Declining twice is harmless.
    game.decline_rematch(&jack).unwrap();
}
