//! Tests for board rules: gravity, win detection, draw condition.

use four_in_a_row::{Board, Cell, ColumnFull, Side};

/// Drops a sequence of `(column, side)` pairs onto a fresh board.
fn board_from_drops(drops: &[(usize, Side)]) -> Board {
    let mut board = Board::new();
    for &(col, side) in drops {
        board.drop(col, side).expect("test drop should land");
    }
    board
}

/// Side pattern with no four-in-a-row anywhere, even on a full board:
/// every horizontal, vertical, and diagonal line alternates with runs of
/// at most two.
fn checker_side(row: usize, col: usize) -> Side {
    if (row + 2 * col) % 4 < 2 {
        Side::Blue
    } else {
        Side::Red
    }
}

/// Fills the given columns completely with the checker pattern.
fn fill_columns(board: &mut Board, cols: &[usize]) {
    for &col in cols {
        for row in (0..7).rev() {
            board.drop(col, checker_side(row, col)).expect("column has room");
        }
    }
}

#[test]
fn test_new_board_is_empty_and_playable() {
    let board = Board::new();
    for row in 0..7 {
        for col in 0..7 {
            assert_eq!(board.get(row, col), Cell::Empty);
        }
    }
    assert_eq!(board.playable_columns(), vec![0, 1, 2, 3, 4, 5, 6]);
    assert!(!board.is_full());
}

#[test]
fn test_drop_lands_on_lowest_empty_row() {
    let mut board = Board::new();
    assert_eq!(board.drop(3, Side::Blue), Ok(6));
    assert_eq!(board.drop(3, Side::Red), Ok(5));
    assert_eq!(board.drop(3, Side::Blue), Ok(4));
    assert_eq!(board.get(6, 3), Cell::Occupied(Side::Blue));
    assert_eq!(board.get(5, 3), Cell::Occupied(Side::Red));
    assert_eq!(board.get(4, 3), Cell::Occupied(Side::Blue));
}

#[test]
fn test_gravity_no_piece_floats_above_a_gap() {
    let board = board_from_drops(&[
        (0, Side::Blue),
        (2, Side::Red),
        (2, Side::Blue),
        (5, Side::Red),
        (2, Side::Red),
    ]);
    for col in 0..7 {
        let mut seen_piece = false;
        // Scan top-down: once a piece appears, everything below is filled.
        for row in 0..7 {
            match board.get(row, col) {
                Cell::Empty => assert!(!seen_piece, "gap below piece in column {col}"),
                Cell::Occupied(_) => seen_piece = true,
            }
        }
    }
}

#[test]
fn test_drop_into_full_column_is_rejected_unchanged() {
    let mut board = Board::new();
    fill_columns(&mut board, &[4]);
    let before = board.clone();
    assert_eq!(board.drop(4, Side::Blue), Err(ColumnFull));
    assert_eq!(board, before);
    assert!(!board.is_playable(4));
}

#[test]
fn test_horizontal_four_detected() {
    let board = board_from_drops(&[
        (1, Side::Blue),
        (2, Side::Blue),
        (3, Side::Blue),
        (4, Side::Blue),
    ]);
    assert!(board.has_four_in_a_row(Side::Blue));
    assert!(!board.has_four_in_a_row(Side::Red));
}

#[test]
fn test_vertical_four_detected() {
    let board = board_from_drops(&[
        (6, Side::Red),
        (6, Side::Red),
        (6, Side::Red),
        (6, Side::Red),
    ]);
    assert!(board.has_four_in_a_row(Side::Red));
    assert!(!board.has_four_in_a_row(Side::Blue));
}

#[test]
fn test_rising_diagonal_four_detected() {
    // Blue staircase from (6,0) up to (3,3) on red supports.
    let board = board_from_drops(&[
        (0, Side::Blue),
        (1, Side::Red),
        (1, Side::Blue),
        (2, Side::Red),
        (2, Side::Red),
        (2, Side::Blue),
        (3, Side::Red),
        (3, Side::Red),
        (3, Side::Red),
        (3, Side::Blue),
    ]);
    assert!(board.has_four_in_a_row(Side::Blue));
    assert!(!board.has_four_in_a_row(Side::Red));
}

#[test]
fn test_falling_diagonal_four_detected() {
    // Blue staircase from (3,0) down to (6,3).
    let board = board_from_drops(&[
        (0, Side::Red),
        (0, Side::Red),
        (0, Side::Red),
        (0, Side::Blue),
        (1, Side::Red),
        (1, Side::Red),
        (1, Side::Blue),
        (2, Side::Red),
        (2, Side::Blue),
        (3, Side::Blue),
    ]);
    assert!(board.has_four_in_a_row(Side::Blue));
    assert!(!board.has_four_in_a_row(Side::Red));
}

#[test]
fn test_three_in_a_row_is_not_a_win() {
    let horizontal = board_from_drops(&[(0, Side::Blue), (1, Side::Blue), (2, Side::Blue)]);
    assert!(!horizontal.has_four_in_a_row(Side::Blue));

    let vertical = board_from_drops(&[(5, Side::Red), (5, Side::Red), (5, Side::Red)]);
    assert!(!vertical.has_four_in_a_row(Side::Red));
}

#[test]
fn test_run_longer_than_four_still_wins() {
    let board = board_from_drops(&[
        (0, Side::Blue),
        (1, Side::Blue),
        (2, Side::Blue),
        (3, Side::Blue),
        (4, Side::Blue),
    ]);
    assert!(board.has_four_in_a_row(Side::Blue));
}

#[test]
fn test_full_top_row_means_no_moves_left() {
    let mut board = Board::new();
    fill_columns(&mut board, &[0, 1, 2, 3, 4, 5, 6]);
    assert!(board.is_full());
    assert!(board.playable_columns().is_empty());
    // The checker pattern never lines up four for either side.
    assert!(!board.has_four_in_a_row(Side::Blue));
    assert!(!board.has_four_in_a_row(Side::Red));
}
