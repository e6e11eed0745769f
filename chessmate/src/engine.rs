//! Game orchestration: turn tracking and the single mutating entry point

use thiserror::Error;

use crate::board::Board;
use crate::movegen;
use crate::validate::{self, MoveError};
use chessmate_base::types::{Color, PieceKind, Square};

/// Error starting a game from a custom position
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// The king of the side that has just moved is attacked
    #[error("the king of the side not on move is already in check")]
    OpponentKingAttacked,
}

/// Tracks whose turn it is
///
/// The turn alternates strictly after every accepted move and never advances on a
/// rejected one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TurnCounter {
    turn: Color,
}

impl TurnCounter {
    pub const fn new() -> TurnCounter {
        TurnCounter {
            turn: Color::White,
        }
    }

    pub const fn starting_with(turn: Color) -> TurnCounter {
        TurnCounter { turn }
    }

    pub const fn turn(&self) -> Color {
        self.turn
    }

    pub fn toggle(&mut self) {
        self.turn = self.turn.inv();
    }
}

impl Default for TurnCounter {
    fn default() -> TurnCounter {
        TurnCounter::new()
    }
}

/// What an accepted move did, for the display layer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Kind of the captured piece, if the move captured one
    pub captured: Option<PieceKind>,
    /// The opponent is now in check
    pub check: bool,
    /// The opponent is checkmated and the game is over
    pub checkmate: bool,
}

/// The chess game itself
///
/// The engine owns the board and the turn counter, validates every requested move and
/// applies the legal ones. [`ChessEngine::move_piece`] is the only way to mutate the
/// game; everything else is a read-only query.
///
/// # Example
///
/// ```
/// # use chessmate::{ChessEngine, Color};
/// #
/// let mut engine = ChessEngine::new();
/// // 1. f3 e5 2. g4 Qh4# — fool's mate.
/// engine.move_piece((5, 1), (5, 2)).unwrap();
/// engine.move_piece((4, 6), (4, 4)).unwrap();
/// engine.move_piece((6, 1), (6, 3)).unwrap();
/// let outcome = engine.move_piece((3, 7), (7, 3)).unwrap();
/// assert!(outcome.checkmate);
/// assert_eq!(engine.winner(), Some(Color::Black));
/// ```
#[derive(Debug, Clone)]
pub struct ChessEngine {
    board: Board,
    turns: TurnCounter,
    checkmate: bool,
}

impl ChessEngine {
    /// Starts a new game from the standard starting position, White to move
    pub fn new() -> ChessEngine {
        ChessEngine {
            board: Board::initial(),
            turns: TurnCounter::new(),
            checkmate: false,
        }
    }

    /// Starts a game from an arbitrary valid position with `side` to move
    ///
    /// The position is rejected if the side that is *not* on move is in check, as such
    /// a position cannot arise from legal play. If `side` is already checkmated, the
    /// game starts in its terminal state.
    pub fn from_position(board: Board, side: Color) -> Result<ChessEngine, PositionError> {
        if board.is_in_check(side.inv()) {
            return Err(PositionError::OpponentKingAttacked);
        }
        let checkmate = board.is_checkmate(side);
        Ok(ChessEngine {
            board,
            turns: TurnCounter::starting_with(side),
            checkmate,
        })
    }

    /// Returns a read-only view of the board
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move next
    #[inline]
    pub fn turn(&self) -> Color {
        self.turns.turn()
    }

    /// Returns `true` once the game has ended in checkmate
    ///
    /// The flag is terminal: it never resets, and every further [`ChessEngine::move_piece`]
    /// call is rejected with [`MoveError::GameOver`].
    #[inline]
    pub fn checkmate(&self) -> bool {
        self.checkmate
    }

    /// Returns the winning side once the game is over
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.checkmate.then(|| self.turns.turn().inv())
    }

    /// Requests the move `from` → `to`, with both squares given as raw `(file, rank)`
    /// integer coordinates
    ///
    /// Coordinates outside the `0..=7` range are rejected with
    /// [`MoveError::MalformedInput`]; everything else behaves as
    /// [`ChessEngine::try_move`].
    pub fn move_piece(
        &mut self,
        from: (i8, i8),
        to: (i8, i8),
    ) -> Result<MoveOutcome, MoveError> {
        if self.checkmate {
            return Err(MoveError::GameOver);
        }
        let from = Square::from_coords(from.0, from.1).ok_or(MoveError::MalformedInput)?;
        let to = Square::from_coords(to.0, to.1).ok_or(MoveError::MalformedInput)?;
        self.try_move(from, to)
    }

    /// Requests the move `from` → `to`
    ///
    /// On success the piece is relocated, a captured piece is taken out of play, the
    /// turn flips, and the checkmate flag is recomputed for the side to move next. On
    /// failure the game state is left completely unchanged.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
        if self.checkmate {
            return Err(MoveError::GameOver);
        }
        let id = validate::validate(&self.board, self.turns.turn(), from, to)?;
        let captured = self
            .board
            .apply_move(id, to)
            .map(|cap| self.board.piece(cap).kind);
        self.turns.toggle();

        let defender = self.turns.turn();
        let check = self.board.is_in_check(defender);
        self.checkmate = check && !movegen::has_legal_moves(&self.board, defender);
        Ok(MoveOutcome {
            captured,
            check,
            checkmate: self.checkmate,
        })
    }
}

impl Default for ChessEngine {
    fn default() -> ChessEngine {
        ChessEngine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn mv(engine: &mut ChessEngine, from: &str, to: &str) -> Result<MoveOutcome, MoveError> {
        engine.try_move(sq(from), sq(to))
    }

    #[test]
    fn test_opening_scenario() {
        let mut engine = ChessEngine::new();
        assert_eq!(engine.turn(), Color::White);

        // White e2-e4, given as raw (file, rank) pairs.
        let outcome = engine.move_piece((4, 1), (4, 3)).unwrap();
        assert_eq!(outcome.captured, None);
        assert!(!outcome.check);
        assert_eq!(engine.turn(), Color::Black);

        // Black may not touch the white pawn again.
        assert_eq!(
            engine.move_piece((4, 3), (4, 4)),
            Err(MoveError::NotYourPiece)
        );
        assert_eq!(engine.turn(), Color::Black);

        // Moving onto a friendly piece is just an unreachable destination.
        assert_eq!(mv(&mut engine, "d8", "d7"), Err(MoveError::IllegalMove));
    }

    #[test]
    fn test_malformed_coordinates() {
        let mut engine = ChessEngine::new();
        assert_eq!(
            engine.move_piece((0, 8), (0, 5)),
            Err(MoveError::MalformedInput)
        );
        assert_eq!(
            engine.move_piece((-1, 0), (0, 0)),
            Err(MoveError::MalformedInput)
        );
        assert_eq!(
            engine.move_piece((4, 1), (4, 9)),
            Err(MoveError::MalformedInput)
        );
        assert_eq!(engine.turn(), Color::White);
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut engine = ChessEngine::new();
        let board_before = engine.board().clone();

        assert_eq!(mv(&mut engine, "a1", "a5"), Err(MoveError::IllegalMove));
        assert_eq!(mv(&mut engine, "e5", "e6"), Err(MoveError::NoPieceAtSource));
        assert_eq!(mv(&mut engine, "e7", "e5"), Err(MoveError::NotYourPiece));

        assert_eq!(*engine.board(), board_before);
        assert_eq!(engine.turn(), Color::White);
        assert!(!engine.checkmate());
    }

    #[test]
    fn test_capture_reported() {
        let mut engine = ChessEngine::new();
        mv(&mut engine, "e2", "e4").unwrap();
        mv(&mut engine, "d7", "d5").unwrap();
        let outcome = mv(&mut engine, "e4", "d5").unwrap();
        assert_eq!(outcome.captured, Some(PieceKind::Pawn));
        assert_eq!(engine.board().alive_pieces().count(), 31);
    }

    #[test]
    fn test_knight_round_trip() {
        let mut engine = ChessEngine::new();
        let board_before = engine.board().clone();
        mv(&mut engine, "g1", "f3").unwrap();
        mv(&mut engine, "b8", "c6").unwrap();
        mv(&mut engine, "f3", "g1").unwrap();
        mv(&mut engine, "c6", "b8").unwrap();
        assert_eq!(*engine.board(), board_before);
        assert_eq!(engine.turn(), Color::White);
    }

    #[test]
    fn test_fools_mate() {
        let mut engine = ChessEngine::new();
        mv(&mut engine, "f2", "f3").unwrap();
        mv(&mut engine, "e7", "e5").unwrap();
        mv(&mut engine, "g2", "g4").unwrap();
        let outcome = mv(&mut engine, "d8", "h4").unwrap();

        assert!(outcome.check);
        assert!(outcome.checkmate);
        assert!(engine.checkmate());
        assert_eq!(engine.winner(), Some(Color::Black));

        // The engine stays queryable but rejects every further move.
        assert_eq!(mv(&mut engine, "e2", "e4"), Err(MoveError::GameOver));
        assert_eq!(engine.move_piece((9, 9), (0, 0)), Err(MoveError::GameOver));
        assert_eq!(engine.board().alive_pieces().count(), 32);
    }

    #[test]
    fn test_two_rook_ladder_mate() {
        let mut builder = BoardBuilder::new();
        builder
            .put(sq("e1"), Color::White, PieceKind::King)
            .put(sq("a6"), Color::White, PieceKind::Rook)
            .put(sq("b1"), Color::White, PieceKind::Rook)
            .put(sq("h8"), Color::Black, PieceKind::King);
        let mut engine =
            ChessEngine::from_position(builder.build().unwrap(), Color::White).unwrap();

        let outcome = mv(&mut engine, "a6", "a7").unwrap();
        assert!(!outcome.check);
        assert!(!engine.checkmate());

        mv(&mut engine, "h8", "g8").unwrap();
        assert!(!engine.checkmate());

        // The mating move, and not a single move earlier, flips the flag.
        let outcome = mv(&mut engine, "b1", "b8").unwrap();
        assert!(outcome.check);
        assert!(outcome.checkmate);
        assert_eq!(engine.winner(), Some(Color::White));
    }

    #[test]
    fn test_from_position_rejects_impossible_check() {
        let mut builder = BoardBuilder::new();
        builder
            .put(sq("e1"), Color::White, PieceKind::King)
            .put(sq("e8"), Color::Black, PieceKind::King)
            .put(sq("e5"), Color::Black, PieceKind::Rook);
        let board = builder.build().unwrap();
        // White is in check, so it cannot be Black's move.
        assert_eq!(
            ChessEngine::from_position(board.clone(), Color::Black).unwrap_err(),
            PositionError::OpponentKingAttacked
        );
        assert!(ChessEngine::from_position(board, Color::White).is_ok());
    }

    #[test]
    fn test_from_position_detects_immediate_mate() {
        let mut builder = BoardBuilder::new();
        builder
            .put(sq("e1"), Color::White, PieceKind::King)
            .put(sq("g8"), Color::Black, PieceKind::King)
            .put(sq("b8"), Color::White, PieceKind::Rook)
            .put(sq("a7"), Color::White, PieceKind::Rook);
        let mut engine =
            ChessEngine::from_position(builder.build().unwrap(), Color::Black).unwrap();
        assert!(engine.checkmate());
        assert_eq!(engine.winner(), Some(Color::White));
        assert_eq!(mv(&mut engine, "g8", "g7"), Err(MoveError::GameOver));
    }

    fn legal_moves(engine: &ChessEngine) -> Vec<(Square, Square)> {
        let board = engine.board();
        let side = engine.turn();
        let mut moves = Vec::new();
        for (id, piece) in board.alive_pieces_of(side) {
            for &dst in crate::movegen::candidate_moves(board, id).iter() {
                if validate::validate(board, side, piece.pos, dst).is_ok() {
                    moves.push((piece.pos, dst));
                }
            }
        }
        moves
    }

    #[test]
    fn test_random_playouts_preserve_invariants() {
        let mut rng = StdRng::seed_from_u64(0xC4E55);
        for _ in 0..20 {
            let mut engine = ChessEngine::new();
            for _ in 0..80 {
                if engine.checkmate() {
                    break;
                }
                let side = engine.turn();

                // A random raw request first; if it is rejected, nothing may change.
                let before = engine.board().clone();
                let from = (rng.gen_range(-1..9), rng.gen_range(-1..9));
                let to = (rng.gen_range(-1..9), rng.gen_range(-1..9));
                if engine.move_piece(from, to).is_err() {
                    assert_eq!(*engine.board(), before);
                    assert_eq!(engine.turn(), side);
                }

                if engine.checkmate() || engine.turn() != side {
                    continue;
                }
                let moves = legal_moves(&engine);
                if moves.is_empty() {
                    // Stalemate; draws are out of scope, just stop the playout.
                    break;
                }
                let &(from, to) = moves.choose(&mut rng).unwrap();
                engine.try_move(from, to).unwrap();

                // An accepted move never leaves the mover's own king attacked,
                // and the turn flips exactly once.
                assert!(!engine.board().is_in_check(side));
                assert_eq!(engine.turn(), side.inv());
            }
        }
    }
}
