//! Game configuration, loadable from TOML.
//!
//! ```toml
//! auto_promote = "Queen"
//! start_placement = "4k3/P7/8/8/8/8/8/4K3"
//! first_to_move = "White"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::check::king_in_check;
use crate::error::{Result, RulesError};
use crate::types::{Color, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Promote straight to this kind instead of waiting for a choice.
    pub auto_promote: Option<PieceKind>,
    /// Piece placement used by `new`/`reset`; standard opening when unset.
    pub start_placement: Option<String>,
    pub first_to_move: Color,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            auto_promote: None,
            start_placement: None,
            first_to_move: Color::White,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(kind) = self.auto_promote {
            if !kind.is_promotion_choice() {
                return Err(RulesError::InvalidPromotionKind(kind));
            }
        }
        let board = self.initial_board()?;
        // The side that just "moved" must not be left in check, or its king
        // could be taken on the first click
        let waiting = self.first_to_move.opposite();
        if king_in_check(&board, waiting) {
            return Err(RulesError::InvalidPlacement(format!(
                "{waiting} is in check but {} is to move",
                self.first_to_move
            )));
        }
        Ok(())
    }

    /// Board that `new`/`reset` start from.
    pub fn initial_board(&self) -> Result<Board> {
        match &self.start_placement {
            Some(placement) => Board::from_placement(placement),
            None => Ok(Board::standard()),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
