//! Outbound render requests for the chat transport.
//!
//! The engine never talks to the transport directly; it hands back
//! [`RenderRequest`] values describing the text to show, which columns
//! are selectable (empty top cell only), and which action buttons apply
//! to the current state.

use crate::ai::Difficulty;
use crate::board::{Board, COLS, Cell, ROWS, Side};
use crate::session::{MessageRef, MultiGame, SingleGame};
use serde::{Deserialize, Serialize};

/// Glyph for a blue piece (human / player one).
pub const BLUE_GLYPH: char = '🔵';

/// Glyph for a red piece (bot / player two).
pub const RED_GLYPH: char = '🔴';

/// Glyph for an empty cell.
pub const EMPTY_GLYPH: char = '⬜';

/// Contextual action button attached to a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionButton {
    /// Start a single-player game at the given tier.
    Difficulty(Difficulty),
    /// Ask to surrender the current game.
    Surrender,
    /// Confirm the pending surrender.
    SurrenderYes,
    /// Cancel the pending surrender.
    SurrenderNo,
    /// Vote for a rematch.
    Rematch,
    /// Open the difficulty menu.
    NewGame,
    /// Return to the main menu.
    MainMenu,
}

/// A request to replace the message at `location`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Opaque handle to the message being edited.
    pub location: MessageRef,
    /// Full text of the message, board rows included where shown.
    pub text: String,
    /// Columns that accept a drop, ascending. Empty when no board is live.
    pub selectable_columns: Vec<usize>,
    /// Buttons applicable to the current state.
    pub actions: Vec<ActionButton>,
}

/// Formats the board as glyph rows, top row first.
pub fn board_rows(board: &Board) -> String {
    let mut out = String::new();
    for row in 0..ROWS {
        for col in 0..COLS {
            out.push(match board.get(row, col) {
                Cell::Empty => EMPTY_GLYPH,
                Cell::Occupied(Side::Blue) => BLUE_GLYPH,
                Cell::Occupied(Side::Red) => RED_GLYPH,
            });
        }
        out.push('\n');
    }
    out
}

/// In-progress single-player board with the surrender button.
pub fn single_board(game: &SingleGame) -> RenderRequest {
    let turn = match game.turn {
        Side::Blue => game.player.name.as_str(),
        Side::Red => "Bot",
    };
    let text = format!(
        "{BLUE_GLYPH} {}\n{RED_GLYPH} Bot\nTurn: {}\n\n{}",
        game.player.name,
        turn,
        board_rows(&game.board),
    );
    RenderRequest {
        location: game.location.clone(),
        text,
        selectable_columns: game.board.playable_columns(),
        actions: vec![ActionButton::Surrender],
    }
}

/// Surrender confirmation prompt for a single-player game.
pub fn single_confirm_surrender(game: &SingleGame) -> RenderRequest {
    RenderRequest {
        location: game.location.clone(),
        text: "Are you sure you want to surrender? 🏳️".to_string(),
        selectable_columns: Vec::new(),
        actions: vec![ActionButton::SurrenderYes, ActionButton::SurrenderNo],
    }
}

/// Terminal screen for a finished single-player game.
pub fn single_over(location: MessageRef, text: String) -> RenderRequest {
    RenderRequest {
        location,
        text,
        selectable_columns: Vec::new(),
        actions: vec![ActionButton::NewGame, ActionButton::MainMenu],
    }
}

/// In-progress multiplayer board with the turn countdown.
pub fn multi_board(game: &MultiGame, remaining: u64) -> RenderRequest {
    let text = format!(
        "{BLUE_GLYPH} {}\n{RED_GLYPH} {}\nTurn: {} ⏳ {}s\n\n{}",
        game.players[0].name,
        game.players[1].name,
        game.player_on(game.turn).name,
        remaining,
        board_rows(&game.board),
    );
    RenderRequest {
        location: game.location.clone(),
        text,
        selectable_columns: game.board.playable_columns(),
        actions: vec![ActionButton::Surrender],
    }
}

/// Terminal multiplayer screen offering a rematch.
pub fn multi_over(game: &MultiGame, headline: String) -> RenderRequest {
    let text = format!("{}\n\n{}", headline, board_rows(&game.board));
    RenderRequest {
        location: game.location.clone(),
        text,
        selectable_columns: Vec::new(),
        actions: vec![ActionButton::Rematch, ActionButton::MainMenu],
    }
}

/// Difficulty selection menu.
pub fn difficulty_menu(location: MessageRef) -> RenderRequest {
    RenderRequest {
        location,
        text: "Pick a difficulty: 🎯".to_string(),
        selectable_columns: Vec::new(),
        actions: vec![
            ActionButton::Difficulty(Difficulty::Easy),
            ActionButton::Difficulty(Difficulty::Medium),
            ActionButton::Difficulty(Difficulty::Hard),
        ],
    }
}

/// Main menu.
pub fn main_menu(location: MessageRef) -> RenderRequest {
    RenderRequest {
        location,
        text: "Welcome! 🌟 Ready for a game of four in a row?".to_string(),
        selectable_columns: Vec::new(),
        actions: vec![ActionButton::NewGame],
    }
}
