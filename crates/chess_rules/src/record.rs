//! Move history entries with short algebraic rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::castling::CastlingSide;
use crate::types::*;

/// Check marker appended to a recorded move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckMark {
    #[default]
    None,
    Check,
    Mate,
}

/// One applied move, as it will be shown in a move list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The piece as it stood before moving.
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
    pub captured: Option<Piece>,
    pub castle: Option<CastlingSide>,
    pub promotion: Option<PieceKind>,
    pub check: CheckMark,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(side) = self.castle {
            write!(f, "{}", side.notation())?;
        } else {
            // Piece letter (except for pawns)
            if self.piece.kind != PieceKind::Pawn {
                write!(f, "{}", self.piece.kind.letter())?;
            }
            if self.captured.is_some() {
                if self.piece.kind == PieceKind::Pawn {
                    write!(f, "{}", (b'a' + self.from.file()) as char)?;
                }
                write!(f, "x")?;
            }
            write!(f, "{}", self.to)?;
            if let Some(promo) = self.promotion {
                write!(f, "={}", promo.letter())?;
            }
        }
        match self.check {
            CheckMark::None => Ok(()),
            CheckMark::Check => write!(f, "+"),
            CheckMark::Mate => write!(f, "#"),
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
