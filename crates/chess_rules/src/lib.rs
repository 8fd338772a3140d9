//! Rules engine for standard chess.
//!
//! Owns the authoritative board, generates legal moves, detects check,
//! checkmate and stalemate, enforces castling and promotion, and sequences
//! turns through [`GameState`]. Rendering and input translation live outside
//! this crate; they call [`GameState::attempt_select_or_move`] and read
//! [`GameState::snapshot`].

pub mod board;
pub mod castling;
pub mod check;
pub mod config;
pub mod error;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod record;
pub mod types;

// Re-export the rules core
pub use board::*;
pub use castling::*;
pub use check::*;
pub use config::*;
pub use error::{Result, RulesError};
pub use game::*;
pub use legal::*;
pub use movegen::*;
pub use record::*;
pub use types::*;
