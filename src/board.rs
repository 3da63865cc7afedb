//! Core domain types for the Connect Four board.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Number of columns on the board.
pub const COLS: usize = 7;

/// Number of rows on the board (row 0 is the top).
pub const ROWS: usize = 7;

/// Number of consecutive same-side cells required to win.
pub const WIN_LEN: usize = 4;

/// A side in the game.
///
/// Blue is the initiating human (single mode) or player one (multi mode);
/// red is the bot or player two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Blue pieces (human / player one, moves first).
    Blue,
    /// Red pieces (bot / player two).
    Red,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell occupied by a side's piece.
    Occupied(Side),
}

/// Error returned when a piece is dropped into a full column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("column is already full")]
pub struct ColumnFull;

/// 7×7 Connect Four board, row 0 at the top.
///
/// The gravity invariant holds by construction: pieces enter only through
/// [`Board::drop`], which always fills the lowest empty cell of a column,
/// so a cell is never occupied above a gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Returns the cell at the given coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of range; callers hold the 0–6
    /// contract.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Drops a piece for `side` into `col`, filling the lowest empty cell.
    ///
    /// Returns the row the piece landed in.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnFull`] if the column has no empty cell; the board
    /// is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `col` is out of range; the orchestrator rejects
    /// out-of-range columns at the boundary before board code runs.
    pub fn drop(&mut self, col: usize, side: Side) -> Result<usize, ColumnFull> {
        for row in (0..ROWS).rev() {
            if self.cells[row][col] == Cell::Empty {
                self.cells[row][col] = Cell::Occupied(side);
                return Ok(row);
            }
        }
        Err(ColumnFull)
    }

    /// Checks whether `col` can accept another piece (top cell empty).
    pub fn is_playable(&self, col: usize) -> bool {
        self.cells[0][col] == Cell::Empty
    }

    /// Returns the playable columns in ascending order.
    pub fn playable_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&c| self.is_playable(c)).collect()
    }

    /// Checks whether no further moves are possible.
    ///
    /// The top row being full is equivalent to board-full under the
    /// gravity invariant, and matches the playable-column definition.
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|c| !self.is_playable(c))
    }

    /// Checks whether `side` has four consecutive pieces in a row,
    /// column, or either diagonal.
    pub fn has_four_in_a_row(&self, side: Side) -> bool {
        let piece = Cell::Occupied(side);
        // (row step, col step) for the four directions; the reverse runs
        // are covered by scanning every starting cell.
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

        for row in 0..ROWS {
            for col in 0..COLS {
                for (dr, dc) in DIRECTIONS {
                    let end_row = row as isize + dr * (WIN_LEN as isize - 1);
                    let end_col = col as isize + dc * (WIN_LEN as isize - 1);
                    if end_row < 0 || end_row >= ROWS as isize || end_col >= COLS as isize {
                        continue;
                    }
                    let hit = (0..WIN_LEN as isize).all(|i| {
                        let r = (row as isize + dr * i) as usize;
                        let c = (col as isize + dc * i) as usize;
                        self.cells[r][c] == piece
                    });
                    if hit {
                        return true;
                    }
                }
            }
        }
        false
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
