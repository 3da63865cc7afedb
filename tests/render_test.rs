//! Tests for board rendering and the transport-facing data contract.

use four_in_a_row::{
    Action, ActionButton, ActionEvent, Board, Difficulty, GameEngine, MemoryLeaderboard,
    MemoryProfiles, Side, board_rows,
};
use std::sync::Arc;
use std::time::Instant;

#[test]
fn test_board_rows_render_top_down_with_side_glyphs() {
    let mut board = Board::new();
    board.drop(0, Side::Blue).unwrap();
    board.drop(0, Side::Red).unwrap();
    board.drop(6, Side::Blue).unwrap();

    let rendered = board_rows(&board);
    let rows: Vec<&str> = rendered.lines().collect();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0], "⬜⬜⬜⬜⬜⬜⬜");
    assert_eq!(rows[5], "🔴⬜⬜⬜⬜⬜⬜");
    assert_eq!(rows[6], "🔵⬜⬜⬜⬜⬜🔵");
}

#[test]
fn test_full_columns_are_not_selectable() {
    let engine = GameEngine::new(
        Arc::new(MemoryProfiles::new()),
        Arc::new(MemoryLeaderboard::new()),
    );
    engine
        .handle(
            ActionEvent {
                actor: 1,
                actor_name: "Alice".to_string(),
                action: Action::StartSingle(Difficulty::Easy),
                location: "msg-1".to_string(),
            },
            Instant::now(),
        )
        .unwrap();
    {
        let mut sessions = engine.store().lock();
        let game = sessions.single_mut(1).unwrap();
        for side in [Side::Blue, Side::Red, Side::Blue, Side::Red, Side::Blue, Side::Red, Side::Blue]
        {
            game.board.drop(2, side).unwrap();
        }
    }
    let reply = engine.refresh_single(1).unwrap();
    assert_eq!(reply.renders[0].selectable_columns, vec![0, 1, 3, 4, 5, 6]);
}

#[test]
fn test_render_requests_serialize_for_the_transport() {
    let engine = GameEngine::new(
        Arc::new(MemoryProfiles::new()),
        Arc::new(MemoryLeaderboard::new()),
    );
    let reply = engine
        .handle(
            ActionEvent {
                actor: 1,
                actor_name: "Alice".to_string(),
                action: Action::NewGame,
                location: "msg-1".to_string(),
            },
            Instant::now(),
        )
        .unwrap();

    let json = serde_json::to_value(&reply.renders[0]).unwrap();
    assert_eq!(json["location"], "msg-1");
    assert_eq!(json["actions"][0]["difficulty"], "easy");
}

#[test]
fn test_actions_round_trip_through_serde() {
    let action = Action::JoinMulti(42);
    let json = serde_json::to_string(&action).unwrap();
    let back: Action = serde_json::from_str(&json).unwrap();
    assert_eq!(back, action);

    let button: ActionButton =
        serde_json::from_str(&serde_json::to_string(&ActionButton::Rematch).unwrap()).unwrap();
    assert_eq!(button, ActionButton::Rematch);
}
