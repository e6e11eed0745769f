//! Board and related things

use std::fmt::{self, Display};

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::movegen;
use chessmate_base::geometry;
use chessmate_base::types::{Color, File, PieceKind, Rank, Square};

/// Upper bound on the number of pieces a board can hold (16 per side)
pub const MAX_PIECES: usize = 32;

/// Position validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum SetupError {
    /// Two pieces were placed on the same square
    #[error("square {0} is already occupied")]
    OccupiedSquare(Square),
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0}")]
    TooManyPieces(Color),
    /// One of the sides doesn't have a king
    #[error("no king of color {0}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0}")]
    TooManyKings(Color),
    /// There is a pawn on the 1st or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Square),
}

/// Stable handle to a piece owned by a [`Board`]
///
/// The handle stays valid for the whole lifetime of the board, even after the piece
/// has been captured.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PieceId(u8);

impl PieceId {
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A single chess piece: its identity, side and current square
///
/// Captured pieces are kept in the board's piece table with `alive` set to `false`, so
/// "this piece was captured" stays distinguishable from "this piece never existed".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub pos: Square,
    pub alive: bool,
}

/// The set of all pieces of a game, alive and captured
///
/// The board owns its pieces exclusively; the only mutation it allows from the outside
/// goes through [`ChessEngine::move_piece`](crate::engine::ChessEngine::move_piece).
/// A valid board holds at most one alive piece per square and exactly one alive king
/// per side, which is enforced by [`BoardBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pieces: ArrayVec<Piece, MAX_PIECES>,
}

impl Board {
    /// Returns a board with the standard starting position
    pub fn initial() -> Board {
        BoardBuilder::initial()
            .build()
            .expect("the initial position is valid")
    }

    /// Returns the piece behind `id`, whether alive or captured
    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// Iterates over every piece ever placed on this board, captured ones included
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces
            .iter()
            .enumerate()
            .map(|(i, p)| (PieceId(i as u8), p))
    }

    /// Iterates over the pieces still in play
    pub fn alive_pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces().filter(|(_, p)| p.alive)
    }

    /// Iterates over the pieces of color `c` still in play
    pub fn alive_pieces_of(&self, c: Color) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.alive_pieces().filter(move |(_, p)| p.color == c)
    }

    /// Returns the alive piece occupying `sq`, if any
    pub fn piece_at(&self, sq: Square) -> Option<PieceId> {
        self.alive_pieces()
            .find(|(_, p)| p.pos == sq)
            .map(|(id, _)| id)
    }

    /// Returns the contents of the square `sq`
    pub fn get(&self, sq: Square) -> Option<&Piece> {
        self.piece_at(sq).map(|id| self.piece(id))
    }

    /// Returns the position of the alive king of color `c`
    pub fn king_pos(&self, c: Color) -> Square {
        self.alive_pieces_of(c)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(_, p)| p.pos)
            .expect("a valid board has one alive king per side")
    }

    /// Returns `true` if the king of color `c` is attacked by an opposing piece
    #[inline]
    pub fn is_in_check(&self, c: Color) -> bool {
        movegen::is_square_attacked(self, self.king_pos(c), c.inv())
    }

    /// Returns `true` if the side `c` is in check and has no legal move
    ///
    /// This function can be computationally expensive, as it calls
    /// [`movegen::has_legal_moves`].
    #[inline]
    pub fn is_checkmate(&self, c: Color) -> bool {
        self.is_in_check(c) && !movegen::has_legal_moves(self, c)
    }

    /// Relocates the piece and marks the captured piece, if any, as no longer alive
    ///
    /// Expects a destination that has already passed validation: it must not hold a
    /// friendly piece.
    pub(crate) fn apply_move(&mut self, id: PieceId, to: Square) -> Option<PieceId> {
        let captured = self.piece_at(to);
        if let Some(cap) = captured {
            debug_assert_ne!(cap, id);
            debug_assert_ne!(self.pieces[cap.index()].color, self.pieces[id.index()].color);
            self.pieces[cap.index()].alive = false;
        }
        self.pieces[id.index()].pos = to;
        captured
    }

    /// Wraps the board to allow pretty-printing with the given style
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }
}

/// Unvalidated piece placement
///
/// The builder can be used to construct an arbitrary position programmatically. Once all
/// the pieces are placed, it must be turned into a [`Board`] via [`BoardBuilder::build`],
/// which checks the position invariants.
///
/// # Example
///
/// ```
/// # use chessmate::{BoardBuilder, Color, PieceKind};
/// #
/// let mut b = BoardBuilder::new();
/// b.put("b2".parse().unwrap(), Color::White, PieceKind::King)
///     .put("d5".parse().unwrap(), Color::Black, PieceKind::King);
/// let board = b.build().unwrap();
/// assert_eq!(board.king_pos(Color::Black).to_string(), "d5");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoardBuilder {
    pieces: Vec<Piece>,
}

impl BoardBuilder {
    pub fn new() -> BoardBuilder {
        BoardBuilder::default()
    }

    /// Returns a builder loaded with the standard starting position
    pub fn initial() -> BoardBuilder {
        let mut res = BoardBuilder::new();
        for file in File::iter() {
            res.put(
                Square::from_parts(file, Rank::R2),
                Color::White,
                PieceKind::Pawn,
            );
            res.put(
                Square::from_parts(file, Rank::R7),
                Color::Black,
                PieceKind::Pawn,
            );
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            for (file, kind) in [
                (File::A, PieceKind::Rook),
                (File::B, PieceKind::Knight),
                (File::C, PieceKind::Bishop),
                (File::D, PieceKind::Queen),
                (File::E, PieceKind::King),
                (File::F, PieceKind::Bishop),
                (File::G, PieceKind::Knight),
                (File::H, PieceKind::Rook),
            ] {
                res.put(Square::from_parts(file, rank), color, kind);
            }
        }
        res
    }

    /// Places a piece on `sq`
    pub fn put(&mut self, sq: Square, color: Color, kind: PieceKind) -> &mut Self {
        self.pieces.push(Piece {
            kind,
            color,
            pos: sq,
            alive: true,
        });
        self
    }

    /// Validates the placement and builds a [`Board`] from it
    pub fn build(&self) -> Result<Board, SetupError> {
        let mut counts = [0_usize; 2];
        let mut kings = [0_usize; 2];
        for (i, p) in self.pieces.iter().enumerate() {
            if self.pieces[..i].iter().any(|q| q.pos == p.pos) {
                return Err(SetupError::OccupiedSquare(p.pos));
            }
            counts[p.color as usize] += 1;
            if counts[p.color as usize] > 16 {
                return Err(SetupError::TooManyPieces(p.color));
            }
            match p.kind {
                PieceKind::King => {
                    kings[p.color as usize] += 1;
                    if kings[p.color as usize] > 1 {
                        return Err(SetupError::TooManyKings(p.color));
                    }
                }
                PieceKind::Pawn => {
                    let rank = p.pos.rank();
                    if rank == geometry::back_rank(Color::White)
                        || rank == geometry::back_rank(Color::Black)
                    {
                        return Err(SetupError::InvalidPawn(p.pos));
                    }
                }
                _ => {}
            }
        }
        for color in [Color::White, Color::Black] {
            if kings[color as usize] == 0 {
                return Err(SetupError::NoKing(color));
            }
        }

        let mut pieces = ArrayVec::new();
        pieces.extend(self.pieces.iter().copied());
        Ok(Board { pieces })
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let (horz, vert, angle) = match self.style {
            PrettyStyle::Ascii => ('-', '|', '+'),
            PrettyStyle::Utf8 => ('─', '│', '┼'),
        };
        for rank in (0..8_usize).rev().map(Rank::from_index) {
            write!(f, "{}{}", rank, vert)?;
            for file in File::iter() {
                let sq = Square::from_parts(file, rank);
                let c = match self.board.get(sq) {
                    Some(p) => match self.style {
                        PrettyStyle::Ascii => p.kind.as_char(p.color),
                        PrettyStyle::Utf8 => p.kind.as_utf8_char(p.color),
                    },
                    None => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", horz, angle)?;
        for _ in File::iter() {
            write!(f, "{}", horz)?;
        }
        writeln!(f)?;
        write!(f, " {}", vert)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(b.pieces().count(), 32);
        assert_eq!(b.alive_pieces().count(), 32);
        assert_eq!(b.alive_pieces_of(Color::White).count(), 16);
        assert_eq!(b.alive_pieces_of(Color::Black).count(), 16);
        assert_eq!(b.king_pos(Color::White), sq("e1"));
        assert_eq!(b.king_pos(Color::Black), sq("e8"));

        let e2 = b.get(sq("e2")).unwrap();
        assert_eq!((e2.kind, e2.color), (PieceKind::Pawn, Color::White));
        let d8 = b.get(sq("d8")).unwrap();
        assert_eq!((d8.kind, d8.color), (PieceKind::Queen, Color::Black));
        assert!(b.get(sq("e4")).is_none());
    }

    #[test]
    fn test_apply_move_capture() {
        let mut b = Board::initial();
        let pawn = b.piece_at(sq("e2")).unwrap();
        assert_eq!(b.apply_move(pawn, sq("e4")), None);
        assert_eq!(b.piece(pawn).pos, sq("e4"));
        assert!(b.get(sq("e2")).is_none());

        // Teleport the pawn onto a black piece to exercise capture bookkeeping.
        let victim = b.piece_at(sq("d7")).unwrap();
        assert_eq!(b.apply_move(pawn, sq("d7")), Some(victim));
        assert!(!b.piece(victim).alive);
        assert_eq!(b.piece_at(sq("d7")), Some(pawn));
        assert_eq!(b.alive_pieces().count(), 31);
        // The captured piece is still recorded, just out of play.
        assert_eq!(b.piece(victim).kind, PieceKind::Pawn);
        assert_eq!(b.pieces().count(), 32);
    }

    #[test]
    fn test_builder_errors() {
        let mut b = BoardBuilder::new();
        b.put(sq("e1"), Color::White, PieceKind::King);
        assert_eq!(b.build(), Err(SetupError::NoKing(Color::Black)));

        b.put(sq("e8"), Color::Black, PieceKind::King);
        assert!(b.build().is_ok());

        let mut dup = b.clone();
        dup.put(sq("e8"), Color::White, PieceKind::Rook);
        assert_eq!(dup.build(), Err(SetupError::OccupiedSquare(sq("e8"))));

        let mut two_kings = b.clone();
        two_kings.put(sq("a1"), Color::White, PieceKind::King);
        assert_eq!(
            two_kings.build(),
            Err(SetupError::TooManyKings(Color::White))
        );

        let mut bad_pawn = b.clone();
        bad_pawn.put(sq("d8"), Color::White, PieceKind::Pawn);
        assert_eq!(bad_pawn.build(), Err(SetupError::InvalidPawn(sq("d8"))));

        let mut crowd = b.clone();
        for file in File::iter() {
            crowd.put(Square::from_parts(file, Rank::R3), Color::White, PieceKind::Pawn);
            crowd.put(Square::from_parts(file, Rank::R4), Color::White, PieceKind::Pawn);
        }
        assert_eq!(crowd.build(), Err(SetupError::TooManyPieces(Color::White)));
    }

    #[test]
    fn test_pretty_ascii() {
        let res = r#"
8|rnbqkbnr
7|pppppppp
6|........
5|........
4|........
3|........
2|PPPPPPPP
1|RNBQKBNR
-+--------
 |abcdefgh
"#;
        assert_eq!(
            Board::initial().pretty(PrettyStyle::Ascii).to_string().trim(),
            res.trim()
        );
    }
}
