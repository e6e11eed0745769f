//! Move legality checking

use thiserror::Error;

use crate::board::{Board, PieceId};
use crate::movegen;
use chessmate_base::types::{Color, Square};

/// Reason a move request was rejected
///
/// Every rejection is a normal return value meant to be shown to the player; the engine
/// state is left completely unchanged by a rejected move.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Coordinates are not a pair of integers in the `0..=7` range
    #[error("coordinates must be pairs of integers between 0 and 7")]
    MalformedInput,
    /// The source square holds no alive piece
    #[error("the selected piece does not exist")]
    NoPieceAtSource,
    /// The piece on the source square belongs to the side not on move
    #[error("that's not your piece")]
    NotYourPiece,
    /// The destination is not among the piece's candidate moves
    #[error("the piece cannot move to that square")]
    IllegalMove,
    /// The move would leave the mover's own king attacked
    #[error("that move would leave your king in check")]
    LeavesKingInCheck,
    /// The game has already ended in checkmate
    #[error("the game is already over")]
    GameOver,
}

/// Decides whether moving the piece on `from` to `to` is legal for `side`
///
/// The checks short-circuit in a fixed order: a missing piece wins over a wrong owner,
/// which wins over an unreachable destination, which wins over an exposed king. On
/// success the id of the piece to move is returned.
///
/// The king-safety probe simulates the move on a copy of the board, so `b` is left
/// untouched regardless of the outcome.
pub fn validate(b: &Board, side: Color, from: Square, to: Square) -> Result<PieceId, MoveError> {
    let id = b.piece_at(from).ok_or(MoveError::NoPieceAtSource)?;
    if b.piece(id).color != side {
        return Err(MoveError::NotYourPiece);
    }
    if !movegen::candidate_moves(b, id).contains(&to) {
        return Err(MoveError::IllegalMove);
    }
    if !movegen::is_king_safe_after(b, id, to) {
        return Err(MoveError::LeavesKingInCheck);
    }
    Ok(id)
}
