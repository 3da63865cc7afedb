//! Automated opponent: move selection per difficulty tier.
//!
//! The bot always plays [`Side::Red`]; the human it reasons about plays
//! [`Side::Blue`]. Selection is a pure function of a board snapshot and a
//! difficulty, so it is safe to call concurrently for independent boards.

use crate::board::{Board, COLS, Side};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Difficulty tier of the automated opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random column choice.
    Easy,
    /// Takes an immediate win, otherwise blocks an immediate loss,
    /// otherwise plays randomly.
    Medium,
    /// Depth-limited minimax search.
    Hard,
}

impl Difficulty {
    /// Leaderboard points awarded to a human who beats this tier.
    pub fn reward(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 3,
            Difficulty::Hard => 10,
        }
    }
}

/// Search depth for hard difficulty, in plies.
const SEARCH_DEPTH: u32 = 5;

/// Terminal score for a won position, from the bot's perspective.
const WIN_SCORE: i32 = 100;

/// Selects the bot's next column, or `None` if no column is playable.
#[instrument(skip(board))]
pub fn select_move(board: &Board, difficulty: Difficulty) -> Option<usize> {
    let playable = board.playable_columns();
    if playable.is_empty() {
        return None;
    }
    let col = match difficulty {
        Difficulty::Easy => *playable
            .choose(&mut rand::thread_rng())
            .expect("playable columns checked non-empty"),
        Difficulty::Medium => medium_move(board, &playable),
        Difficulty::Hard => hard_move(board, &playable),
    };
    debug!(col, "Bot selected column");
    Some(col)
}

/// Checks whether dropping `side` into `col` wins immediately.
fn wins_at(board: &Board, col: usize, side: Side) -> bool {
    let mut probe = board.clone();
    probe.drop(col, side).is_ok() && probe.has_four_in_a_row(side)
}

/// One-ply heuristic: take a win, then block the human, then random.
fn medium_move(board: &Board, playable: &[usize]) -> usize {
    for &col in playable {
        if wins_at(board, col, Side::Red) {
            return col;
        }
    }
    for &col in playable {
        if wins_at(board, col, Side::Blue) {
            return col;
        }
    }
    *playable
        .choose(&mut rand::thread_rng())
        .expect("playable columns checked non-empty")
}

/// Minimax root: the first column reaching the maximum score wins,
/// columns considered in ascending order.
fn hard_move(board: &Board, playable: &[usize]) -> usize {
    let mut best_score = i32::MIN;
    let mut best_col = playable[0];
    for &col in playable {
        let mut child = board.clone();
        child
            .drop(col, Side::Red)
            .expect("playable column accepts a drop");
        let score = minimax(&child, SEARCH_DEPTH, false);
        if score > best_score {
            best_score = score;
            best_col = col;
        }
    }
    debug!(best_col, best_score, "Minimax root complete");
    best_col
}

/// Depth-limited minimax over the bot's (maximizing) and human's
/// (minimizing) moves. Leaves score +100 for a bot win, -100 for a human
/// win, and 0 on depth exhaustion or a full top row.
fn minimax(board: &Board, depth: u32, maximizing: bool) -> i32 {
    if board.has_four_in_a_row(Side::Red) {
        return WIN_SCORE;
    }
    if board.has_four_in_a_row(Side::Blue) {
        return -WIN_SCORE;
    }
    if depth == 0 || board.is_full() {
        return 0;
    }

    let side = if maximizing { Side::Red } else { Side::Blue };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for col in 0..COLS {
        if !board.is_playable(col) {
            continue;
        }
        let mut child = board.clone();
        child
            .drop(col, side)
            .expect("playable column accepts a drop");
        let score = minimax(&child, depth - 1, !maximizing);
        if maximizing {
            best = best.max(score);
        } else {
            best = best.min(score);
        }
    }
    best
}
