//! Pseudo-legal move generation and attack sets.
//!
//! Nothing here knows about check: moves may leave the mover's own king
//! attacked. [`crate::legal`] narrows them down.

use crate::board::Board;
use crate::castling::{CastlingPath, CastlingRights, CastlingSide};
use crate::types::*;

pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Squares the piece on `from` could move to, ignoring self-check.
///
/// With `castling` set, an unmoved king also gets the destination square of
/// every castling move whose rights are still available; whether the path is
/// clear and safe is decided by the legality filter.
pub fn pseudo_destinations(
    board: &Board,
    from: Position,
    castling: Option<&CastlingRights>,
) -> Vec<Position> {
    let mut out = Vec::with_capacity(28);
    let pc = match board.piece_at(from) {
        Some(p) => p,
        None => return out,
    };
    match pc.kind {
        PieceKind::Pawn => gen_pawn_pushes(board, from, pc.color, &mut out),
        PieceKind::King => {
            gen_steps(board, from, pc.color, &KING_DELTAS, &mut out);
            if let Some(rights) = castling {
                gen_castle_candidates(from, pc, rights, &mut out);
            }
        }
        _ => gen_piece_attacks(board, from, pc, &mut out),
    }
    out
}

/// Squares the piece on `from` threatens.
///
/// Same as its moves except that a pawn threatens exactly its two forward
/// diagonals (occupied or not) and a king never includes castling.
pub fn attack_set(board: &Board, from: Position) -> Vec<Position> {
    let mut out = Vec::with_capacity(28);
    if let Some(pc) = board.piece_at(from) {
        match pc.kind {
            PieceKind::Pawn => {
                let dir = pc.color.pawn_direction();
                out.extend([-1, 1].into_iter().filter_map(|df| from.offset(df, dir)));
            }
            _ => gen_piece_attacks(board, from, pc, &mut out),
        }
    }
    out
}

fn gen_piece_attacks(board: &Board, from: Position, pc: Piece, out: &mut Vec<Position>) {
    match pc.kind {
        PieceKind::Knight => gen_steps(board, from, pc.color, &KNIGHT_DELTAS, out),
        PieceKind::Bishop => gen_slider(board, from, pc.color, &DIAGONALS, out),
        PieceKind::Rook => gen_slider(board, from, pc.color, &ORTHOGONALS, out),
        PieceKind::Queen => {
            gen_slider(board, from, pc.color, &DIAGONALS, out);
            gen_slider(board, from, pc.color, &ORTHOGONALS, out);
        }
        PieceKind::King => gen_steps(board, from, pc.color, &KING_DELTAS, out),
        PieceKind::Pawn => {}
    }
}

fn gen_pawn_pushes(board: &Board, from: Position, c: Color, out: &mut Vec<Position>) {
    let dir = c.pawn_direction();

    // forward 1, forward 2 from the start rank
    if let Some(to) = from.offset(0, dir) {
        if board.is_empty(to) {
            out.push(to);
            if from.rank() == c.pawn_start_rank() {
                if let Some(to2) = from.offset(0, 2 * dir) {
                    if board.is_empty(to2) {
                        out.push(to2);
                    }
                }
            }
        }
    }

    // captures only; no en passant
    for df in [-1, 1] {
        if let Some(to) = from.offset(df, dir) {
            if board.is_occupied_by(to, c.opposite()) {
                out.push(to);
            }
        }
    }
}

fn gen_steps(board: &Board, from: Position, c: Color, deltas: &[(i8, i8)], out: &mut Vec<Position>) {
    for &(df, dr) in deltas {
        if let Some(to) = from.offset(df, dr) {
            if !board.is_occupied_by(to, c) {
                out.push(to);
            }
        }
    }
}

fn gen_slider(board: &Board, from: Position, c: Color, dirs: &[(i8, i8)], out: &mut Vec<Position>) {
    for &(df, dr) in dirs {
        let mut cur = from.offset(df, dr);
        while let Some(to) = cur {
            match board.piece_at(to) {
                None => out.push(to),
                Some(pc) if pc.color != c => {
                    out.push(to);
                    break;
                }
                _ => break,
            }
            cur = to.offset(df, dr);
        }
    }
}

fn gen_castle_candidates(from: Position, king: Piece, rights: &CastlingRights, out: &mut Vec<Position>) {
    if king.has_moved {
        return;
    }
    for side in CastlingSide::ALL {
        let path = CastlingPath::new(king.color, side);
        if path.king_from == from && rights.can_castle(king.color, side) {
            out.push(path.king_to);
        }
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
