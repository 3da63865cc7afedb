//! Tests for the collaborator seams: rate limiter and leaderboard.

use four_in_a_row::{
    Action, ActionEvent, Difficulty, GameEngine, MemoryLeaderboard, MemoryProfiles, RateLimiter,
    ScoreSink, WindowLimiter,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn test_window_limiter_blocks_a_burst_for_thirty_seconds() {
    let limiter = WindowLimiter::new();
    let t0 = Instant::now();

    assert!(limiter.allow(1, t0));
    assert!(limiter.allow(1, t0));
    // Third action within the one-second window trips the block.
    assert!(!limiter.allow(1, t0));
    assert!(!limiter.allow(1, t0 + Duration::from_secs(29)));
    // After the block lapses the window starts over.
    assert!(limiter.allow(1, t0 + Duration::from_secs(31)));
}

#[test]
fn test_window_limiter_tracks_identities_independently() {
    let limiter = WindowLimiter::new();
    let t0 = Instant::now();

    limiter.allow(1, t0);
    limiter.allow(1, t0);
    assert!(!limiter.allow(1, t0));
    assert!(limiter.allow(2, t0));
}

#[test]
fn test_spaced_actions_never_block() {
    let limiter = WindowLimiter::new();
    let t0 = Instant::now();
    for i in 0..10 {
        assert!(limiter.allow(7, t0 + Duration::from_secs(2 * i)));
    }
}

#[test]
fn test_engine_drops_rate_limited_actions_without_state_change() {
    let engine = GameEngine::new(
        Arc::new(MemoryProfiles::new()),
        Arc::new(MemoryLeaderboard::new()),
    )
    .with_limiter(Arc::new(WindowLimiter::new()));
    let now = Instant::now();
    let event = |action| ActionEvent {
        actor: 1,
        actor_name: "Alice".to_string(),
        action,
        location: "msg-1".to_string(),
    };

    engine
        .handle(event(Action::StartSingle(Difficulty::Easy)), now)
        .unwrap();
    engine
        .handle(event(Action::StartSingle(Difficulty::Medium)), now)
        .unwrap();
    let reply = engine
        .handle(event(Action::StartSingle(Difficulty::Hard)), now)
        .unwrap();
    assert!(reply.renders.is_empty());
    assert!(reply.notice.is_some());

    // The second start survived; the third never reached the store.
    let mut sessions = engine.store().lock();
    let game = sessions.single_mut(1).expect("session exists");
    assert_eq!(game.difficulty, Difficulty::Medium);
}

#[test]
fn test_leaderboard_accumulates_and_ranks() {
    let board = MemoryLeaderboard::new();
    board.credit(1, "Alice", 3);
    board.credit(2, "Bob", 10);
    board.credit(1, "Alice", 2);

    assert_eq!(board.score_of(1), 5);
    assert_eq!(board.score_of(2), 10);
    assert_eq!(
        board.top(5),
        vec![("Bob".to_string(), 10), ("Alice".to_string(), 5)]
    );
}
