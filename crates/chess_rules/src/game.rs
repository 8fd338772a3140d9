//! Turn sequencing: selection, move application, promotion and game end.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::castling::{CastlingPath, CastlingRights};
use crate::check::king_in_check;
use crate::config::GameConfig;
use crate::error::{Result, RulesError};
use crate::legal::{has_any_legal_move, legal_destinations, legal_moves};
use crate::record::{CheckMark, MoveRecord};
use crate::types::*;

/// Where the turn state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingSelection,
    PieceSelected(Position),
    /// A pawn landed on the last rank and needs a promotion choice.
    PromotionPending(Position),
    /// `None` means the game ended without a winner (stalemate).
    GameOver(Option<Color>),
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEnd {
    Checkmate { winner: Color },
    Stalemate,
}

/// Result of one input to [`GameState::attempt_select_or_move`] or [`GameState::promote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Selected(BTreeSet<Position>),
    Moved {
        captured: Option<Piece>,
        promotion_pending: Option<Position>,
    },
    Deselected,
    Checkmate(Color),
    Stalemate,
    Promoted(PieceKind),
    Ignored,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub placement: String,
    pub turn: Color,
    pub phase: Phase,
    pub selected: Option<Position>,
    pub legal_destinations: Vec<Position>,
    pub promotion_pending: Option<Position>,
    pub winner: Option<Color>,
    pub in_check: bool,
    pub last_move: Option<String>,
}

#[derive(Debug, Clone)]
struct PendingPromotion {
    square: Position,
    record: MoveRecord,
    captured: Option<Piece>,
}

/// Authoritative state of one game.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    initial_board: Board,
    board: Board,
    turn: Color,
    castling_rights: CastlingRights,
    /// Currently selected square (for move input)
    selected: Option<Position>,
    /// Legal moves from selected square
    legal_moves_for_selected: BTreeSet<Position>,
    pending_promotion: Option<PendingPromotion>,
    end: Option<GameEnd>,
    history: Vec<MoveRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Standard game, White to move.
    pub fn new() -> Self {
        Self::from_parts(GameConfig::default(), Board::standard())
    }

    /// Game configured by `config`; fails if its placement or promotion kind is invalid.
    pub fn with_config(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let initial_board = config.initial_board()?;
        Ok(Self::from_parts(config, initial_board))
    }

    fn from_parts(config: GameConfig, initial_board: Board) -> Self {
        let mut state = GameState {
            turn: config.first_to_move,
            config,
            board: initial_board.clone(),
            initial_board,
            castling_rights: CastlingRights::all(),
            selected: None,
            legal_moves_for_selected: BTreeSet::new(),
            pending_promotion: None,
            end: None,
            history: Vec::new(),
        };
        state.reset();
        state
    }

    /// Back to the starting position with selection, history and result cleared.
    pub fn reset(&mut self) {
        self.board = self.initial_board.clone();
        self.turn = self.config.first_to_move;
        self.castling_rights = CastlingRights::from_board(&self.board);
        self.clear_selection();
        self.pending_promotion = None;
        self.history.clear();
        self.end = self.end_for_side_to_move(king_in_check(&self.board, self.turn));
        info!(turn = %self.turn, end = ?self.end, "game reset");
    }

    pub fn phase(&self) -> Phase {
        if let Some(end) = self.end {
            return Phase::GameOver(match end {
                GameEnd::Checkmate { winner } => Some(winner),
                GameEnd::Stalemate => None,
            });
        }
        if let Some(p) = &self.pending_promotion {
            return Phase::PromotionPending(p.square);
        }
        match self.selected {
            Some(pos) => Phase::PieceSelected(pos),
            None => Phase::AwaitingSelection,
        }
    }

    /// Feed one clicked square into the state machine.
    ///
    /// Player mistakes never surface as errors: a bad destination deselects,
    /// anything else that cannot be acted on is `Ignored`.
    pub fn attempt_select_or_move(&mut self, pos: Position) -> TurnOutcome {
        match self.try_select_or_move(pos) {
            Ok(outcome) => outcome,
            Err(RulesError::IllegalDestination { from, to }) => {
                debug!(%from, %to, "not a legal destination, deselected");
                TurnOutcome::Deselected
            }
            Err(e) => {
                debug!(square = %pos, error = %e, "input ignored");
                TurnOutcome::Ignored
            }
        }
    }

    /// Like [`GameState::attempt_select_or_move`] but reports why input was refused.
    ///
    /// On `IllegalDestination` the selection has already been cleared; every
    /// other error leaves the state untouched.
    pub fn try_select_or_move(&mut self, pos: Position) -> Result<TurnOutcome> {
        if self.end.is_some() {
            return Err(RulesError::GameOver);
        }
        if let Some(p) = &self.pending_promotion {
            return Err(RulesError::PromotionRequiredButMissing(p.square));
        }

        // Clicking a piece of the side to move selects it (or deselects it if
        // it was already selected)
        if self.board.is_occupied_by(pos, self.turn) {
            if self.selected == Some(pos) {
                self.clear_selection();
                debug!(square = %pos, "deselected");
                return Ok(TurnOutcome::Deselected);
            }
            self.selected = Some(pos);
            self.legal_moves_for_selected = legal_destinations(&self.board, &self.castling_rights, pos);
            debug!(square = %pos, moves = self.legal_moves_for_selected.len(), "selected");
            return Ok(TurnOutcome::Selected(self.legal_moves_for_selected.clone()));
        }

        match self.selected {
            Some(from) if self.legal_moves_for_selected.contains(&pos) => Ok(self.apply_move(from, pos)),
            Some(from) => {
                self.clear_selection();
                Err(RulesError::IllegalDestination { from, to: pos })
            }
            None => Err(RulesError::IllegalSelection(pos)),
        }
    }

    /// Resolve a pending promotion on `pos`.
    ///
    /// # Panics
    /// If `kind` is King or Pawn.
    pub fn promote(&mut self, pos: Position, kind: PieceKind) -> Result<TurnOutcome> {
        if self.end.is_some() {
            return Err(RulesError::GameOver);
        }
        let pending = match self.pending_promotion.take() {
            Some(p) if p.square == pos => p,
            Some(p) => {
                let expected = p.square;
                self.pending_promotion = Some(p);
                return Err(RulesError::PromotionSquareMismatch {
                    expected,
                    requested: pos,
                });
            }
            None => return Err(RulesError::NoPromotionPending),
        };
        assert!(kind.is_promotion_choice(), "cannot promote to {kind:?}");
        Ok(self.finish_promotion(pending, kind))
    }

    fn apply_move(&mut self, from: Position, to: Position) -> TurnOutcome {
        let Some(piece) = self.board.remove(from) else {
            panic!("board invariant broken: selected square {from} is empty");
        };

        // Castling rook move
        let castle = if piece.kind == PieceKind::King {
            CastlingPath::for_king_move(piece.color, from, to).map(|path| {
                if let Some(mut rook) = self.board.remove(path.rook_from) {
                    rook.has_moved = true;
                    self.board.place(path.rook_to, rook);
                }
                path.side
            })
        } else {
            None
        };

        let moved = Piece {
            has_moved: true,
            ..piece
        };
        let captured = self.board.place(to, moved);
        assert!(
            !matches!(captured, Some(pc) if pc.kind == PieceKind::King),
            "board invariant broken: king captured on {to}"
        );
        self.castling_rights.update_for_move(piece, from, to);
        self.clear_selection();

        info!(
            color = %piece.color,
            piece = ?piece.kind,
            %from,
            %to,
            captured = ?captured.map(|c| c.kind),
            "move applied"
        );

        let record = MoveRecord {
            piece,
            from,
            to,
            captured,
            castle,
            promotion: None,
            check: CheckMark::None,
        };

        if piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank() {
            let pending = PendingPromotion {
                square: to,
                record,
                captured,
            };
            if let Some(kind) = self.config.auto_promote {
                return self.finish_promotion(pending, kind);
            }
            self.pending_promotion = Some(pending);
            debug!(square = %to, "promotion pending");
            return TurnOutcome::Moved {
                captured,
                promotion_pending: Some(to),
            };
        }

        match self.end_turn(record) {
            Some(outcome) => outcome,
            None => TurnOutcome::Moved {
                captured,
                promotion_pending: None,
            },
        }
    }

    fn finish_promotion(&mut self, pending: PendingPromotion, kind: PieceKind) -> TurnOutcome {
        let PendingPromotion {
            square,
            mut record,
            captured,
        } = pending;
        if let Some(pawn) = self.board.piece_at(square) {
            self.board.place(square, Piece { kind, ..pawn });
        }
        record.promotion = Some(kind);
        info!(%square, piece = ?kind, "pawn promoted");

        match self.end_turn(record) {
            Some(outcome) => outcome,
            None if self.config.auto_promote.is_some() => TurnOutcome::Moved {
                captured,
                promotion_pending: None,
            },
            None => TurnOutcome::Promoted(kind),
        }
    }

    /// Passes the turn and checks whether the new side to move is finished.
    fn end_turn(&mut self, mut record: MoveRecord) -> Option<TurnOutcome> {
        self.board.assert_kings();
        let mover = self.turn;
        self.turn = mover.opposite();

        let in_check = king_in_check(&self.board, self.turn);
        self.end = self.end_for_side_to_move(in_check);
        let outcome = match self.end {
            Some(GameEnd::Checkmate { winner }) => {
                record.check = CheckMark::Mate;
                info!(%winner, "checkmate");
                Some(TurnOutcome::Checkmate(winner))
            }
            Some(GameEnd::Stalemate) => {
                info!("stalemate");
                Some(TurnOutcome::Stalemate)
            }
            None => {
                if in_check {
                    record.check = CheckMark::Check;
                }
                None
            }
        };
        self.history.push(record);
        outcome
    }

    /// Checkmate or stalemate for the side to move, if it has no legal move.
    fn end_for_side_to_move(&self, in_check: bool) -> Option<GameEnd> {
        if has_any_legal_move(&self.board, &self.castling_rights, self.turn) {
            return None;
        }
        Some(if in_check {
            GameEnd::Checkmate {
                winner: self.turn.opposite(),
            }
        } else {
            GameEnd::Stalemate
        })
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.legal_moves_for_selected.clear();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Owned copy of the board for renderers.
    pub fn board_snapshot(&self) -> Board {
        self.board.clone()
    }

    pub fn current_turn(&self) -> Color {
        self.turn
    }

    pub fn winner(&self) -> Option<Color> {
        match self.end {
            Some(GameEnd::Checkmate { winner }) => Some(winner),
            _ => None,
        }
    }

    pub fn game_end(&self) -> Option<GameEnd> {
        self.end
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn selected_legal_destinations(&self) -> &BTreeSet<Position> {
        &self.legal_moves_for_selected
    }

    pub fn promotion_pending(&self) -> Option<Position> {
        self.pending_promotion.as_ref().map(|p| p.square)
    }

    pub fn castling_rights(&self) -> &CastlingRights {
        &self.castling_rights
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether the side to move is in check.
    pub fn in_check(&self) -> bool {
        king_in_check(&self.board, self.turn)
    }

    /// All legal `(from, to)` pairs for the side to move; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<(Position, Position)> {
        if self.end.is_some() || self.pending_promotion.is_some() {
            return Vec::new();
        }
        legal_moves(&self.board, &self.castling_rights, self.turn)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            placement: self.board.to_placement(),
            turn: self.turn,
            phase: self.phase(),
            selected: self.selected,
            legal_destinations: self.legal_moves_for_selected.iter().copied().collect(),
            promotion_pending: self.promotion_pending(),
            winner: self.winner(),
            in_check: self.in_check(),
            last_move: self.last_move().map(|m| m.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
