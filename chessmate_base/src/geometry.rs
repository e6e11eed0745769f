use derive_more::{Add, Neg};

use crate::types::{Color, Rank};

/// Displacement between two squares, in files and ranks
///
/// Positive `rank` points towards Black's side of the board, so White pawns move by a
/// positive rank delta.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Add, Neg)]
pub struct Delta {
    pub file: i8,
    pub rank: i8,
}

impl Delta {
    pub const fn new(file: i8, rank: i8) -> Delta {
        Delta { file, rank }
    }
}

pub const KNIGHT_DELTAS: [Delta; 8] = [
    Delta::new(1, 2),
    Delta::new(2, 1),
    Delta::new(2, -1),
    Delta::new(1, -2),
    Delta::new(-1, -2),
    Delta::new(-2, -1),
    Delta::new(-2, 1),
    Delta::new(-1, 2),
];

pub const KING_DELTAS: [Delta; 8] = [
    Delta::new(-1, 1),
    Delta::new(0, 1),
    Delta::new(1, 1),
    Delta::new(1, 0),
    Delta::new(1, -1),
    Delta::new(0, -1),
    Delta::new(-1, -1),
    Delta::new(-1, 0),
];

pub const BISHOP_DIRS: [Delta; 4] = [
    Delta::new(1, 1),
    Delta::new(-1, 1),
    Delta::new(1, -1),
    Delta::new(-1, -1),
];

pub const ROOK_DIRS: [Delta; 4] = [
    Delta::new(-1, 0),
    Delta::new(1, 0),
    Delta::new(0, -1),
    Delta::new(0, 1),
];

pub const fn pawn_forward(c: Color) -> Delta {
    match c {
        Color::White => Delta::new(0, 1),
        Color::Black => Delta::new(0, -1),
    }
}

pub const fn pawn_captures(c: Color) -> [Delta; 2] {
    match c {
        Color::White => [Delta::new(-1, 1), Delta::new(1, 1)],
        Color::Black => [Delta::new(-1, -1), Delta::new(1, -1)],
    }
}

/// Rank from which a pawn may make its double step
pub const fn pawn_start_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

pub const fn back_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}
