//! # chessmate
//!
//! A two-player chess rules engine. It owns the authoritative board state, validates
//! requested moves under orthodox movement rules, applies the legal ones, and detects
//! check and checkmate to end the game.
//!
//! Castling, en passant, pawn promotion and draw detection are intentionally out of
//! scope: the engine supports orthodox piece movement, capture, turn alternation,
//! check and checkmate.
//!
//! # Example
//!
//! ```
//! use chessmate::{ChessEngine, Color, MoveError};
//!
//! let mut engine = ChessEngine::new();
//!
//! // Squares are (file, rank) pairs with both coordinates in 0..=7.
//! engine.move_piece((4, 1), (4, 3)).unwrap(); // e2-e4
//! assert_eq!(engine.turn(), Color::Black);
//!
//! // Rejected moves explain themselves and change nothing.
//! let err = engine.move_piece((4, 3), (4, 4)).unwrap_err();
//! assert_eq!(err, MoveError::NotYourPiece);
//! assert_eq!(engine.turn(), Color::Black);
//! ```

pub mod board;
pub mod engine;
pub mod movegen;
pub mod validate;

pub use chessmate_base::geometry;
pub use chessmate_base::types::{self, Color, File, PieceKind, Rank, Square};

pub use board::{Board, BoardBuilder, Piece, PieceId, PrettyStyle, SetupError};
pub use engine::{ChessEngine, MoveOutcome, PositionError, TurnCounter};
pub use validate::MoveError;
