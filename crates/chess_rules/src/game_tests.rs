use super::*;
use crate::CastlingSide;

fn sq(s: &str) -> Position {
    s.parse().unwrap()
}

fn game_from(placement: &str) -> GameState {
    GameState::with_config(GameConfig {
        start_placement: Some(placement.to_string()),
        ..GameConfig::default()
    })
    .unwrap()
}

/// Select `from`, then click `to`.
fn play(game: &mut GameState, from: &str, to: &str) -> TurnOutcome {
    match game.attempt_select_or_move(sq(from)) {
        TurnOutcome::Selected(moves) => assert!(moves.contains(&sq(to)), "{from}-{to} not legal"),
        other => panic!("selecting {from} gave {other:?}"),
    }
    game.attempt_select_or_move(sq(to))
}

#[test]
fn test_new_game() {
    let game = GameState::new();
    assert_eq!(game.current_turn(), Color::White);
    assert_eq!(game.phase(), Phase::AwaitingSelection);
    assert_eq!(game.winner(), None);
    assert_eq!(game.board_snapshot(), Board::standard());
    assert_eq!(game.castling_rights(), &CastlingRights::all());
    assert!(game.history().is_empty());
    assert_eq!(game.legal_moves().len(), 20);
}

#[test]
fn test_select_own_piece() {
    let mut game = GameState::new();
    let outcome = game.attempt_select_or_move(sq("b1"));
    let expected: BTreeSet<Position> = [sq("a3"), sq("c3")].into_iter().collect();
    assert_eq!(outcome, TurnOutcome::Selected(expected.clone()));
    assert_eq!(game.phase(), Phase::PieceSelected(sq("b1")));
    assert_eq!(game.selected_legal_destinations(), &expected);
}

#[test]
fn test_illegal_input_is_idempotent() {
    let mut game = GameState::new();
    let before = game.board_snapshot();
    for _ in 0..3 {
        assert_eq!(game.attempt_select_or_move(sq("e4")), TurnOutcome::Ignored);
        assert_eq!(game.attempt_select_or_move(sq("e7")), TurnOutcome::Ignored);
    }
    assert_eq!(game.board_snapshot(), before);
    assert_eq!(game.current_turn(), Color::White);
    assert_eq!(game.phase(), Phase::AwaitingSelection);

    assert!(matches!(
        game.try_select_or_move(sq("e7")),
        Err(RulesError::IllegalSelection(p)) if p == sq("e7")
    ));
}

#[test]
fn test_reselect_and_deselect() {
    let mut game = GameState::new();
    game.attempt_select_or_move(sq("b1"));
    // Same piece again deselects
    assert_eq!(game.attempt_select_or_move(sq("b1")), TurnOutcome::Deselected);
    assert_eq!(game.phase(), Phase::AwaitingSelection);
    assert!(game.selected_legal_destinations().is_empty());

    // Another own piece switches the selection
    game.attempt_select_or_move(sq("b1"));
    assert!(matches!(game.attempt_select_or_move(sq("g1")), TurnOutcome::Selected(_)));
    assert_eq!(game.selected(), Some(sq("g1")));

    // A square outside the legal set deselects without moving
    let before = game.board_snapshot();
    assert_eq!(game.attempt_select_or_move(sq("g4")), TurnOutcome::Deselected);
    assert_eq!(game.board_snapshot(), before);
    assert_eq!(game.current_turn(), Color::White);
    assert_eq!(game.selected(), None);
}

#[test]
fn test_illegal_destination_error() {
    let mut game = GameState::new();
    game.attempt_select_or_move(sq("e2"));
    assert!(matches!(
        game.try_select_or_move(sq("e5")),
        Err(RulesError::IllegalDestination { from, to }) if from == sq("e2") && to == sq("e5")
    ));
    assert_eq!(game.selected(), None);
}

#[test]
fn test_move_passes_turn() {
    let mut game = GameState::new();
    let outcome = play(&mut game, "e2", "e4");
    assert_eq!(
        outcome,
        TurnOutcome::Moved {
            captured: None,
            promotion_pending: None
        }
    );
    assert_eq!(game.current_turn(), Color::Black);
    assert!(game.board().is_empty(sq("e2")));
    let pawn = game.board().piece_at(sq("e4")).unwrap();
    assert!(pawn.has_moved);
    assert_eq!(game.last_move().unwrap().to_string(), "e4");
    // White can no longer select
    assert_eq!(game.attempt_select_or_move(sq("d2")), TurnOutcome::Ignored);
}

#[test]
fn test_capture_reports_piece() {
    let mut game = GameState::new();
    play(&mut game, "e2", "e4");
    play(&mut game, "d7", "d5");
    let outcome = play(&mut game, "e4", "d5");
    match outcome {
        TurnOutcome::Moved {
            captured: Some(pc), ..
        } => {
            assert_eq!(pc.color, Color::Black);
            assert_eq!(pc.kind, PieceKind::Pawn);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(game.board().pieces_of(Color::Black).count(), 15);
    assert_eq!(game.last_move().unwrap().to_string(), "exd5");
}

#[test]
fn test_king_side_castle_moves_rook() {
    let mut game = game_from("r3k2r/8/8/8/8/8/8/R3K2R");
    play(&mut game, "e1", "g1");
    let b = game.board();
    let king = b.piece_at(sq("g1")).unwrap();
    let rook = b.piece_at(sq("f1")).unwrap();
    assert_eq!(king.kind, PieceKind::King);
    assert_eq!(rook.kind, PieceKind::Rook);
    assert!(king.has_moved && rook.has_moved);
    assert!(b.is_empty(sq("e1")) && b.is_empty(sq("h1")));
    assert!(!game.castling_rights().can_castle(Color::White, CastlingSide::KingSide));
    assert!(!game.castling_rights().can_castle(Color::White, CastlingSide::QueenSide));
    assert_eq!(game.last_move().unwrap().to_string(), "O-O");

    // Black castles long
    play(&mut game, "e8", "c8");
    let b = game.board();
    assert_eq!(b.piece_at(sq("c8")).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(b.piece_at(sq("d8")).map(|p| p.kind), Some(PieceKind::Rook));
    assert!(b.is_empty(sq("a8")) && b.is_empty(sq("e8")));
    assert_eq!(game.last_move().unwrap().to_string(), "O-O-O");
}

#[test]
fn test_rook_return_does_not_restore_castling() {
    let mut game = game_from("r3k2r/8/8/8/8/8/8/R3K2R");
    play(&mut game, "h1", "h2");
    play(&mut game, "a8", "a7");
    play(&mut game, "h2", "h1");
    play(&mut game, "a7", "a8");
    match game.attempt_select_or_move(sq("e1")) {
        TurnOutcome::Selected(moves) => {
            assert!(!moves.contains(&sq("g1")));
            assert!(moves.contains(&sq("c1")));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_promotion_flow() {
    let mut game = game_from("8/P6k/8/8/8/8/8/4K3");
    let outcome = play(&mut game, "a7", "a8");
    assert_eq!(
        outcome,
        TurnOutcome::Moved {
            captured: None,
            promotion_pending: Some(sq("a8"))
        }
    );
    assert_eq!(game.phase(), Phase::PromotionPending(sq("a8")));
    assert_eq!(game.promotion_pending(), Some(sq("a8")));
    assert_eq!(game.current_turn(), Color::White);

    // Nothing else is accepted until the choice is made
    let before = game.board_snapshot();
    assert_eq!(game.attempt_select_or_move(sq("e1")), TurnOutcome::Ignored);
    assert!(matches!(
        game.try_select_or_move(sq("e1")),
        Err(RulesError::PromotionRequiredButMissing(p)) if p == sq("a8")
    ));
    assert_eq!(game.board_snapshot(), before);
    assert!(game.legal_moves().is_empty());

    assert!(matches!(
        game.promote(sq("b8"), PieceKind::Queen),
        Err(RulesError::PromotionSquareMismatch { .. })
    ));
    assert_eq!(
        game.promote(sq("a8"), PieceKind::Queen).unwrap(),
        TurnOutcome::Promoted(PieceKind::Queen)
    );
    let queen = game.board().piece_at(sq("a8")).unwrap();
    assert_eq!(queen.kind, PieceKind::Queen);
    assert_eq!(queen.color, Color::White);
    assert!(queen.has_moved);
    assert_eq!(game.current_turn(), Color::Black);
    assert_eq!(game.last_move().unwrap().to_string(), "a8=Q");

    assert!(matches!(
        game.promote(sq("a8"), PieceKind::Queen),
        Err(RulesError::NoPromotionPending)
    ));
}

#[test]
#[should_panic(expected = "cannot promote")]
fn test_promotion_to_king_is_fatal() {
    let mut game = game_from("8/P6k/8/8/8/8/8/4K3");
    play(&mut game, "a7", "a8");
    let _ = game.promote(sq("a8"), PieceKind::King);
}

#[test]
fn test_auto_promotion() {
    let mut game = GameState::with_config(GameConfig {
        auto_promote: Some(PieceKind::Knight),
        start_placement: Some("8/P6k/8/8/8/8/8/4K3".to_string()),
        ..GameConfig::default()
    })
    .unwrap();
    let outcome = play(&mut game, "a7", "a8");
    assert_eq!(
        outcome,
        TurnOutcome::Moved {
            captured: None,
            promotion_pending: None
        }
    );
    assert_eq!(
        game.board().piece_at(sq("a8")).map(|p| p.kind),
        Some(PieceKind::Knight)
    );
    assert_eq!(game.current_turn(), Color::Black);
}

#[test]
fn test_stalemate_ends_game_without_winner() {
    let mut game = game_from("k7/2K5/8/1Q6/8/8/8/8");
    assert_eq!(play(&mut game, "b5", "b6"), TurnOutcome::Stalemate);
    assert_eq!(game.phase(), Phase::GameOver(None));
    assert_eq!(game.winner(), None);
    assert_eq!(game.game_end(), Some(GameEnd::Stalemate));
    assert_eq!(game.attempt_select_or_move(sq("a8")), TurnOutcome::Ignored);
}

#[test]
fn test_game_over_ignores_input_until_reset() {
    let mut game = GameState::new();
    play(&mut game, "f2", "f3");
    play(&mut game, "e7", "e5");
    play(&mut game, "g2", "g4");
    assert_eq!(play(&mut game, "d8", "h4"), TurnOutcome::Checkmate(Color::Black));

    let before = game.board_snapshot();
    assert_eq!(game.attempt_select_or_move(sq("e2")), TurnOutcome::Ignored);
    assert!(matches!(game.try_select_or_move(sq("e2")), Err(RulesError::GameOver)));
    assert!(matches!(game.promote(sq("e8"), PieceKind::Queen), Err(RulesError::GameOver)));
    assert_eq!(game.board_snapshot(), before);

    game.reset();
    assert_eq!(game.phase(), Phase::AwaitingSelection);
    assert_eq!(game.winner(), None);
    assert_eq!(game.current_turn(), Color::White);
    assert_eq!(game.board_snapshot(), Board::standard());
    assert!(game.history().is_empty());
}

#[test]
fn test_check_is_recorded() {
    let mut game = GameState::new();
    play(&mut game, "e2", "e4");
    play(&mut game, "f7", "f6");
    play(&mut game, "d1", "h5");
    assert!(game.in_check());
    assert_eq!(game.last_move().unwrap().to_string(), "Qh5+");
    assert_eq!(game.winner(), None);
}

#[test]
fn test_first_to_move_from_config() {
    let game = GameState::with_config(GameConfig {
        first_to_move: Color::Black,
        ..GameConfig::default()
    })
    .unwrap();
    assert_eq!(game.current_turn(), Color::Black);
}

#[test]
fn test_invalid_config_rejected() {
    let err = GameState::with_config(GameConfig {
        auto_promote: Some(PieceKind::Pawn),
        ..GameConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, RulesError::InvalidPromotionKind(PieceKind::Pawn)));
}

#[test]
fn test_config_with_capturable_king_rejected() {
    let err = GameState::with_config(GameConfig {
        start_placement: Some("4k3/8/8/8/8/8/8/4R2K".to_string()),
        ..GameConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, RulesError::InvalidPlacement(_)));
}

fn black_to_move_from(placement: &str) -> GameState {
    GameState::with_config(GameConfig {
        start_placement: Some(placement.to_string()),
        first_to_move: Color::Black,
        ..GameConfig::default()
    })
    .unwrap()
}

#[test]
fn test_start_position_already_stalemate() {
    let mut game = black_to_move_from("k7/8/1Q6/8/8/8/8/7K");
    assert_eq!(game.phase(), Phase::GameOver(None));
    assert_eq!(game.game_end(), Some(GameEnd::Stalemate));
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.attempt_select_or_move(sq("a8")), TurnOutcome::Ignored);

    // Reset lands in the same finished position
    game.reset();
    assert_eq!(game.game_end(), Some(GameEnd::Stalemate));
}

#[test]
fn test_start_position_already_checkmate() {
    let game = black_to_move_from("k7/1Q6/1K6/8/8/8/8/8");
    assert!(game.in_check());
    assert_eq!(game.winner(), Some(Color::White));
    assert_eq!(game.phase(), Phase::GameOver(Some(Color::White)));
    assert!(game.history().is_empty());
}

#[test]
fn test_snapshot() {
    let mut game = GameState::new();
    game.attempt_select_or_move(sq("g1"));
    let snap = game.snapshot();
    assert_eq!(snap.turn, Color::White);
    assert_eq!(snap.selected, Some(sq("g1")));
    assert_eq!(snap.legal_destinations, vec![sq("f3"), sq("h3")]);
    assert_eq!(snap.phase, Phase::PieceSelected(sq("g1")));
    assert_eq!(snap.placement, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    assert!(!snap.in_check);

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["selected"], "g1");
    assert_eq!(json["legal_destinations"][1], "h3");
    assert_eq!(json["turn"], "White");
}
