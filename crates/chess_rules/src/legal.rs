//! Legal move filtering: castling path rules and the self-check filter.
//!
//! Every candidate is played on a copy of the board and rejected if it leaves
//! the mover's own king attacked. This applies to all pieces, not only the king.

use std::collections::BTreeSet;

use tracing::trace;

use crate::board::Board;
use crate::castling::{CastlingPath, CastlingRights, CastlingSide};
use crate::check::{is_square_attacked, king_in_check};
use crate::movegen::pseudo_destinations;
use crate::types::*;

/// Legal destinations for the piece on `pos`, castling included.
///
/// Empty if the square is empty.
pub fn legal_destinations(board: &Board, rights: &CastlingRights, pos: Position) -> BTreeSet<Position> {
    destinations(board, Some(rights), pos)
}

/// Every legal `(from, to)` pair for `color`.
pub fn legal_moves(board: &Board, rights: &CastlingRights, color: Color) -> Vec<(Position, Position)> {
    board
        .pieces_of(color)
        .flat_map(|(from, _)| {
            legal_destinations(board, rights, from)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

/// Whether `color` can castle on `side` right now.
///
/// Requires the latch still set, king and that rook unmoved on their home
/// squares, an empty path between them, and no attacked square on the king's
/// walk (its start square included, so castling out of check is refused).
pub fn castling_allowed(board: &Board, rights: &CastlingRights, color: Color, side: CastlingSide) -> bool {
    if !rights.can_castle(color, side) {
        return false;
    }
    let path = CastlingPath::new(color, side);
    let unmoved = |pos: Position, kind: PieceKind| {
        matches!(board.piece_at(pos),
            Some(pc) if pc.color == color && pc.kind == kind && !pc.has_moved)
    };
    if !unmoved(path.king_from, PieceKind::King) || !unmoved(path.rook_from, PieceKind::Rook) {
        return false;
    }
    if path.between().any(|sq| !board.is_empty(sq)) {
        return false;
    }
    let enemy = color.opposite();
    let safe = path
        .king_walk()
        .iter()
        .all(|&sq| !is_square_attacked(board, sq, enemy));
    if !safe {
        trace!(%color, ?side, "castling refused: king walk attacked");
    }
    safe
}

/// Board after moving `from` to `to`, relocating the rook as well for a
/// castling move. Promotion is not applied; it cannot change whether the
/// mover's king is attacked.
pub fn play_on_copy(board: &Board, from: Position, to: Position) -> Board {
    let mut next = board.clone();
    if let Some(mut pc) = next.remove(from) {
        if pc.kind == PieceKind::King {
            if let Some(path) = CastlingPath::for_king_move(pc.color, from, to) {
                if let Some(rook) = next.remove(path.rook_from) {
                    next.place(path.rook_to, rook);
                }
            }
        }
        pc.has_moved = true;
        next.place(to, pc);
    }
    next
}

/// True iff `color` is in check and no friendly piece has a legal move.
///
/// The king's own escapes are tried first (castling suppressed); only if it
/// has none are blocks and captures by the other pieces considered.
///
/// # Panics
/// If `color` has no king on the board.
pub fn king_in_checkmate(board: &Board, rights: &CastlingRights, color: Color) -> bool {
    let ksq = board
        .king_position(color)
        .unwrap_or_else(|| panic!("board invariant broken: no {color} king"));
    if !is_square_attacked(board, ksq, color.opposite()) {
        return false;
    }
    destinations(board, None, ksq).is_empty() && !has_any_legal_move(board, rights, color)
}

/// True iff `color` is not in check but has no legal move.
pub fn is_stalemate(board: &Board, rights: &CastlingRights, color: Color) -> bool {
    !king_in_check(board, color) && !has_any_legal_move(board, rights, color)
}

pub fn has_any_legal_move(board: &Board, rights: &CastlingRights, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|(from, _)| !legal_destinations(board, rights, from).is_empty())
}

fn destinations(board: &Board, rights: Option<&CastlingRights>, pos: Position) -> BTreeSet<Position> {
    let pc = match board.piece_at(pos) {
        Some(p) => p,
        None => return BTreeSet::new(),
    };
    pseudo_destinations(board, pos, rights)
        .into_iter()
        .filter(|&to| {
            if pc.kind == PieceKind::King {
                if let (Some(rights), Some(path)) = (rights, CastlingPath::for_king_move(pc.color, pos, to)) {
                    if !castling_allowed(board, rights, pc.color, path.side) {
                        return false;
                    }
                }
            }
            let leaves_check = king_in_check(&play_on_copy(board, pos, to), pc.color);
            if leaves_check {
                trace!(from = %pos, %to, "rejected: leaves own king in check");
            }
            !leaves_check
        })
        .collect()
}

#[cfg(test)]
#[path = "legal_tests.rs"]
mod legal_tests;
