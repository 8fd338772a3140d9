use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulesError};
use crate::types::*;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 8x8 grid of optional occupants, indexed `[rank][file]`.
///
/// The board does no legality checking of its own; it is the container the
/// rules operate on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard opening layout.
    pub fn standard() -> Self {
        let mut b = Board::empty();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            for color in Color::ALL {
                b.squares[color.home_rank() as usize][file as usize] = Some(Piece::new(color, kind));
                b.squares[color.pawn_start_rank() as usize][file as usize] =
                    Some(Piece::new(color, PieceKind::Pawn));
            }
        }
        b
    }

    /// Parses the piece-placement field of a FEN string (`"rnbqkbnr/pppppppp/8/..."`).
    ///
    /// Pieces standing away from their starting squares are marked as moved so
    /// that castling and double pushes behave as they would in a real game.
    pub fn from_placement(placement: &str) -> Result<Self> {
        let ranks: Vec<&str> = placement.trim().split('/').collect();
        if ranks.len() != 8 {
            return Err(RulesError::InvalidPlacement(format!(
                "expected 8 ranks, found {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8; // placement lists rank 8 .. 1
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    if d == 0 || d > 8 {
                        return Err(RulesError::InvalidPlacement(format!(
                            "bad empty-run digit {ch:?}"
                        )));
                    }
                    file += d as u8;
                } else {
                    let mut piece = Piece::from_symbol(ch).ok_or_else(|| {
                        RulesError::InvalidPlacement(format!("unknown piece {ch:?}"))
                    })?;
                    let pos = Position::new(file, rank).ok_or_else(|| {
                        RulesError::InvalidPlacement(format!("rank {} is too long", rank + 1))
                    })?;
                    if piece.kind == PieceKind::Pawn
                        && (rank == Color::White.home_rank() || rank == Color::Black.home_rank())
                    {
                        return Err(RulesError::InvalidPlacement(format!("pawn on {pos}")));
                    }
                    piece.has_moved = !starts_on(piece, pos);
                    board.place(pos, piece);
                    file += 1;
                }
                if file > 8 {
                    return Err(RulesError::InvalidPlacement(format!(
                        "rank {} is too long",
                        rank + 1
                    )));
                }
            }
            if file != 8 {
                return Err(RulesError::InvalidPlacement(format!(
                    "rank {} has {file} files",
                    rank + 1
                )));
            }
        }

        for color in Color::ALL {
            let kings = board
                .pieces_of(color)
                .filter(|(_, pc)| pc.kind == PieceKind::King)
                .count();
            if kings != 1 {
                return Err(RulesError::InvalidPlacement(format!(
                    "{color} has {kings} kings"
                )));
            }
        }
        Ok(board)
    }

    /// Inverse of [`Board::from_placement`] (moved flags are not encoded).
    pub fn to_placement(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.squares[rank][file] {
                    Some(pc) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(pc.symbol());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.rank() as usize][pos.file() as usize]
    }

    /// Raw `(file, rank)` lookup; anything off the board reads as empty.
    pub fn piece_at_coords(&self, file: i8, rank: i8) -> Option<Piece> {
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            self.squares[rank as usize][file as usize]
        } else {
            None
        }
    }

    /// Puts `piece` on `pos`, returning whatever stood there.
    pub fn place(&mut self, pos: Position, piece: Piece) -> Option<Piece> {
        self.squares[pos.rank() as usize][pos.file() as usize].replace(piece)
    }

    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        self.squares[pos.rank() as usize][pos.file() as usize].take()
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    pub fn is_occupied_by(&self, pos: Position, color: Color) -> bool {
        matches!(self.piece_at(pos), Some(pc) if pc.color == color)
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.piece_at(pos).map(|pc| (pos, pc)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, pc)| pc.color == color)
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces_of(color)
            .find(|(_, pc)| pc.kind == PieceKind::King)
            .map(|(pos, _)| pos)
    }

    /// Checks the one-king-per-side invariant.
    ///
    /// # Panics
    /// If either side has no king or more than one.
    pub fn assert_kings(&self) {
        for color in Color::ALL {
            let kings = self
                .pieces_of(color)
                .filter(|(_, pc)| pc.kind == PieceKind::King)
                .count();
            assert!(kings == 1, "board invariant broken: {color} has {kings} kings");
        }
    }
}

/// Whether `pos` is a square this piece occupies in the opening layout.
fn starts_on(piece: Piece, pos: Position) -> bool {
    match piece.kind {
        PieceKind::Pawn => pos.rank() == piece.color.pawn_start_rank(),
        kind => pos.rank() == piece.color.home_rank() && BACK_RANK[pos.file() as usize] == kind,
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let ch = self.squares[rank][file].map_or('.', |pc| pc.symbol());
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
