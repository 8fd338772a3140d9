//! Error types for chess_rules
//!
//! Only recoverable conditions live here. Broken board invariants (a missing
//! or duplicated king, promotion to King/Pawn, a captured king) panic instead.

use thiserror::Error;

use crate::types::{PieceKind, Position};

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),

    #[error("no piece of the side to move on {0}")]
    IllegalSelection(Position),

    #[error("{to} is not a legal destination from {from}")]
    IllegalDestination { from: Position, to: Position },

    #[error("pawn on {0} must be promoted before any other move")]
    PromotionRequiredButMissing(Position),

    #[error("no promotion is pending")]
    NoPromotionPending,

    #[error("promotion is pending on {expected}, not {requested}")]
    PromotionSquareMismatch {
        expected: Position,
        requested: Position,
    },

    #[error("cannot promote to {0:?}")]
    InvalidPromotionKind(PieceKind),

    #[error("the game is over")]
    GameOver,

    #[error("config parsing failed: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RulesError>;
