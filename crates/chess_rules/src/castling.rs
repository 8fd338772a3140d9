//! Castling rights and the fixed geometry of the two castling moves.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    pub const ALL: [CastlingSide; 2] = [CastlingSide::KingSide, CastlingSide::QueenSide];

    fn rook_file(self) -> u8 {
        match self {
            CastlingSide::KingSide => 7,
            CastlingSide::QueenSide => 0,
        }
    }
    fn step(self) -> i8 {
        match self {
            CastlingSide::KingSide => 1,
            CastlingSide::QueenSide => -1,
        }
    }

    pub fn notation(self) -> &'static str {
        match self {
            CastlingSide::KingSide => "O-O",
            CastlingSide::QueenSide => "O-O-O",
        }
    }
}

/// Squares involved in one castling move for one color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastlingPath {
    pub side: CastlingSide,
    pub king_from: Position,
    pub king_to: Position,
    pub rook_from: Position,
    pub rook_to: Position,
}

impl CastlingPath {
    pub fn new(color: Color, side: CastlingSide) -> Self {
        let rank = color.home_rank();
        let at = |file: u8| Position::new(file, rank).expect("home rank file in range");
        let king_from = at(4);
        let king_to = at((4 + 2 * side.step()) as u8);
        let rook_to = at((4 + side.step()) as u8);
        CastlingPath {
            side,
            king_from,
            king_to,
            rook_from: at(side.rook_file()),
            rook_to,
        }
    }

    /// Castling move whose king lands on `king_to`, if any.
    pub fn for_king_move(color: Color, from: Position, to: Position) -> Option<CastlingPath> {
        CastlingSide::ALL
            .into_iter()
            .map(|side| CastlingPath::new(color, side))
            .find(|p| p.king_from == from && p.king_to == to)
    }

    /// Squares strictly between king and rook; all must be empty.
    pub fn between(&self) -> impl Iterator<Item = Position> {
        let rank = self.king_from.rank();
        let (lo, hi) = if self.king_from.file() < self.rook_from.file() {
            (self.king_from.file(), self.rook_from.file())
        } else {
            (self.rook_from.file(), self.king_from.file())
        };
        (lo + 1..hi).filter_map(move |f| Position::new(f, rank))
    }

    /// King's start, the square it crosses and its destination; none may be attacked.
    pub fn king_walk(&self) -> [Position; 3] {
        [self.king_from, self.rook_to, self.king_to]
    }
}

/// One side's pair of one-way castling latches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Castling {
    pub king_side: bool,
    pub queen_side: bool,
}

impl Castling {
    fn get(&self, side: CastlingSide) -> bool {
        match side {
            CastlingSide::KingSide => self.king_side,
            CastlingSide::QueenSide => self.queen_side,
        }
    }
    fn clear(&mut self, side: CastlingSide) {
        match side {
            CastlingSide::KingSide => self.king_side = false,
            CastlingSide::QueenSide => self.queen_side = false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white: Castling,
    pub black: Castling,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

impl CastlingRights {
    pub fn all() -> Self {
        let both = Castling {
            king_side: true,
            queen_side: true,
        };
        CastlingRights {
            white: both,
            black: both,
        }
    }

    pub fn none() -> Self {
        let neither = Castling {
            king_side: false,
            queen_side: false,
        };
        CastlingRights {
            white: neither,
            black: neither,
        }
    }

    /// Rights for an arbitrary board: available only where king and rook are
    /// still unmoved on their home squares.
    pub fn from_board(board: &Board) -> Self {
        let mut rights = CastlingRights::all();
        for color in Color::ALL {
            for side in CastlingSide::ALL {
                let path = CastlingPath::new(color, side);
                let unmoved = |pos: Position, kind: PieceKind| {
                    matches!(board.piece_at(pos),
                        Some(pc) if pc.color == color && pc.kind == kind && !pc.has_moved)
                };
                if !(unmoved(path.king_from, PieceKind::King)
                    && unmoved(path.rook_from, PieceKind::Rook))
                {
                    rights.revoke(color, side);
                }
            }
        }
        rights
    }

    fn of(&self, color: Color) -> &Castling {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
    fn of_mut(&mut self, color: Color) -> &mut Castling {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    pub fn can_castle(&self, color: Color, side: CastlingSide) -> bool {
        self.of(color).get(side)
    }

    pub fn revoke(&mut self, color: Color, side: CastlingSide) {
        self.of_mut(color).clear(side);
    }

    /// Latches rights off for a piece leaving `from` or a capture landing on `to`.
    pub fn update_for_move(&mut self, moved: Piece, from: Position, to: Position) {
        if moved.kind == PieceKind::King {
            for side in CastlingSide::ALL {
                self.revoke(moved.color, side);
            }
        }
        for color in Color::ALL {
            for side in CastlingSide::ALL {
                let rook_home = CastlingPath::new(color, side).rook_from;
                if rook_home == from || rook_home == to {
                    self.revoke(color, side);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "castling_tests.rs"]
mod castling_tests;
