//! Candidate move generation and attack detection
//!
//! A candidate move is a destination square a piece could reach ignoring whether it
//! leaves its own king in check. The king-safety filter lives in
//! [`validate`](crate::validate), not here.

use std::ops::Deref;
use std::slice;

use arrayvec::ArrayVec;

use crate::board::{Board, Piece, PieceId};
use chessmate_base::geometry::{self, Delta};
use chessmate_base::types::{Color, PieceKind, Square};

/// The most destinations a single piece can have (a queen in the open has 27)
const MAX_CANDIDATES: usize = 28;

/// Candidate destinations of a single piece
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Square, MAX_CANDIDATES>);

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

impl Deref for MoveList {
    type Target = [Square];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Square;
    type IntoIter = slice::Iter<'a, Square>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Computes every square the piece behind `id` could move to, ignoring king safety
///
/// Squares outside the board are excluded here rather than reported as errors; the
/// engine entry point is the only place that rejects malformed coordinates.
pub fn candidate_moves(b: &Board, id: PieceId) -> MoveList {
    let piece = b.piece(id);
    debug_assert!(piece.alive, "candidate moves requested for a captured piece");
    let mut list = MoveList::new();
    match piece.kind {
        PieceKind::Pawn => gen_pawn(b, piece, &mut list),
        PieceKind::Knight => gen_leaper(b, piece, &geometry::KNIGHT_DELTAS, &mut list),
        PieceKind::King => gen_leaper(b, piece, &geometry::KING_DELTAS, &mut list),
        PieceKind::Bishop => gen_slider(b, piece, &geometry::BISHOP_DIRS, &mut list),
        PieceKind::Rook => gen_slider(b, piece, &geometry::ROOK_DIRS, &mut list),
        PieceKind::Queen => {
            gen_slider(b, piece, &geometry::BISHOP_DIRS, &mut list);
            gen_slider(b, piece, &geometry::ROOK_DIRS, &mut list);
        }
    }
    list
}

fn gen_pawn(b: &Board, piece: &Piece, out: &mut MoveList) {
    let fwd = geometry::pawn_forward(piece.color);
    if let Some(dst) = piece.pos.shift(fwd) {
        if b.piece_at(dst).is_none() {
            out.0.push(dst);
            // The double step stays available while the pawn sits on its starting rank.
            if piece.pos.rank() == geometry::pawn_start_rank(piece.color) {
                if let Some(dst2) = piece.pos.shift(fwd + fwd) {
                    if b.piece_at(dst2).is_none() {
                        out.0.push(dst2);
                    }
                }
            }
        }
    }
    for d in geometry::pawn_captures(piece.color) {
        if let Some(dst) = piece.pos.shift(d) {
            if b.get(dst).map_or(false, |t| t.color != piece.color) {
                out.0.push(dst);
            }
        }
    }
}

fn gen_leaper(b: &Board, piece: &Piece, deltas: &[Delta], out: &mut MoveList) {
    for &d in deltas {
        if let Some(dst) = piece.pos.shift(d) {
            if b.get(dst).map_or(true, |t| t.color != piece.color) {
                out.0.push(dst);
            }
        }
    }
}

fn gen_slider(b: &Board, piece: &Piece, dirs: &[Delta], out: &mut MoveList) {
    for &d in dirs {
        let mut cur = piece.pos;
        while let Some(dst) = cur.shift(d) {
            match b.get(dst) {
                None => {
                    out.0.push(dst);
                    cur = dst;
                }
                Some(t) => {
                    if t.color != piece.color {
                        out.0.push(dst);
                    }
                    break;
                }
            }
        }
    }
}

/// Returns `true` if any alive piece of color `by` has `sq` among its candidate moves
///
/// This is a pure read-only query, safe to call on a board mid-simulation.
pub fn is_square_attacked(b: &Board, sq: Square, by: Color) -> bool {
    b.alive_pieces_of(by)
        .any(|(id, _)| candidate_moves(b, id).contains(&sq))
}

/// Probes whether moving the piece behind `id` to `dst` keeps its own king safe
///
/// The probe runs on a throwaway copy of the board, so the caller's board is left
/// untouched on every path.
pub(crate) fn is_king_safe_after(b: &Board, id: PieceId, dst: Square) -> bool {
    let side = b.piece(id).color;
    let mut probe = b.clone();
    probe.apply_move(id, dst);
    !probe.is_in_check(side)
}

/// Returns `true` if the side `c` has at least one legal move
///
/// The scan stops as soon as a single legal move is found.
pub fn has_legal_moves(b: &Board, c: Color) -> bool {
    b.alive_pieces_of(c).any(|(id, _)| {
        candidate_moves(b, id)
            .iter()
            .any(|&dst| is_king_safe_after(b, id, dst))
    })
}
