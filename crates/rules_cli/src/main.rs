mod command;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use chess_rules::{GameConfig, GameState, Phase, TurnOutcome};
use command::{parse_line, Command, HELP};
use tracing::{error, info};

fn main() -> ExitCode {
    // stdout carries the protocol, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    let game = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(Path::new(&path)).and_then(GameState::with_config),
        None => Ok(GameState::new()),
    };
    let mut game = match game {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "could not start game");
            return ExitCode::FAILURE;
        }
    };
    info!(turn = %game.current_turn(), "rules_cli ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", game.board()).ok();
    print_prompt(&mut stdout, &game);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        match parse_line(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(cmd)) => run(&mut stdout, &mut game, cmd),
            Ok(None) => {}
            Err(msg) => {
                writeln!(stdout, "error: {msg}").ok();
            }
        }
        print_prompt(&mut stdout, &game);
    }
    ExitCode::SUCCESS
}

fn run(out: &mut impl Write, game: &mut GameState, cmd: Command) {
    match cmd {
        Command::Square(pos) => {
            let outcome = game.attempt_select_or_move(pos);
            report(out, game, &outcome);
        }
        Command::Promote(kind) => {
            let Some(at) = game.promotion_pending() else {
                writeln!(out, "error: no promotion pending").ok();
                return;
            };
            match game.promote(at, kind) {
                Ok(outcome) => report(out, game, &outcome),
                Err(e) => {
                    writeln!(out, "error: {e}").ok();
                }
            }
        }
        Command::Reset => {
            game.reset();
            writeln!(out, "{}", game.board()).ok();
        }
        Command::Board => {
            writeln!(out, "{}", game.board()).ok();
        }
        Command::Moves => {
            let moves: Vec<String> = game
                .legal_moves()
                .into_iter()
                .map(|(from, to)| format!("{from}{to}"))
                .collect();
            writeln!(out, "{}", moves.join(" ")).ok();
        }
        Command::History => {
            for (i, pair) in game.history().chunks(2).enumerate() {
                let moves: Vec<String> = pair.iter().map(|m| m.to_string()).collect();
                writeln!(out, "{}. {}", i + 1, moves.join(" ")).ok();
            }
        }
        Command::Json => match serde_json::to_string_pretty(&game.snapshot()) {
            Ok(json) => {
                writeln!(out, "{json}").ok();
            }
            Err(e) => {
                writeln!(out, "error: {e}").ok();
            }
        },
        Command::Help => {
            writeln!(out, "{HELP}").ok();
        }
        Command::Quit => {}
    }
}

fn report(out: &mut impl Write, game: &GameState, outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::Selected(dests) => {
            let dests: Vec<String> = dests.iter().map(|p| p.to_string()).collect();
            if dests.is_empty() {
                writeln!(out, "selected, no legal moves").ok();
            } else {
                writeln!(out, "selected: {}", dests.join(" ")).ok();
            }
        }
        TurnOutcome::Deselected => {
            writeln!(out, "deselected").ok();
        }
        TurnOutcome::Ignored => {
            writeln!(out, "ignored").ok();
        }
        TurnOutcome::Moved {
            promotion_pending: Some(at),
            ..
        } => {
            writeln!(out, "{}", game.board()).ok();
            writeln!(out, "pawn on {at} must promote: promote <q|r|b|n>").ok();
        }
        TurnOutcome::Moved { .. } | TurnOutcome::Promoted(_) => {
            if let Some(mv) = game.last_move() {
                writeln!(out, "played {mv}").ok();
            }
            writeln!(out, "{}", game.board()).ok();
        }
        TurnOutcome::Checkmate(winner) => {
            writeln!(out, "{}", game.board()).ok();
            writeln!(out, "checkmate, {winner} wins").ok();
        }
        TurnOutcome::Stalemate => {
            writeln!(out, "{}", game.board()).ok();
            writeln!(out, "stalemate").ok();
        }
    }
    out.flush().ok();
}

fn print_prompt(out: &mut impl Write, game: &GameState) {
    let prompt = match game.phase() {
        Phase::GameOver(_) => "game over (reset to play again)".to_string(),
        Phase::PromotionPending(at) => format!("promotion on {at}"),
        Phase::PieceSelected(pos) => format!("{} to move, {pos} selected", game.current_turn()),
        Phase::AwaitingSelection if game.in_check() => format!("{} to move (check)", game.current_turn()),
        Phase::AwaitingSelection => format!("{} to move", game.current_turn()),
    };
    write!(out, "{prompt}> ").ok();
    out.flush().ok();
}
