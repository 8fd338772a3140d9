//! Line protocol understood by the text adapter.

use chess_rules::{PieceKind, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A clicked square, e.g. `e2`.
    Square(Position),
    Promote(PieceKind),
    Reset,
    Board,
    Moves,
    History,
    Json,
    Help,
    Quit,
}

/// Parses one input line. `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        return Ok(None);
    };

    let cmd = match head {
        "promote" => {
            let arg = parts.get(1).ok_or("usage: promote <q|r|b|n>")?;
            let mut chars = arg.chars();
            let kind = match (chars.next(), chars.next()) {
                (Some(ch), None) => PieceKind::from_letter(ch),
                _ => None,
            };
            match kind {
                Some(kind) if kind.is_promotion_choice() => Command::Promote(kind),
                _ => return Err(format!("cannot promote to '{arg}'")),
            }
        }
        "reset" | "new" => Command::Reset,
        "board" | "d" => Command::Board,
        "moves" => Command::Moves,
        "history" => Command::History,
        "json" => Command::Json,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => match other.parse::<Position>() {
            Ok(pos) => Command::Square(pos),
            Err(e) => return Err(format!("unknown command '{other}' ({e})")),
        },
    };
    Ok(Some(cmd))
}

pub const HELP: &str = "\
commands:
  <square>          select a piece or move the selected one (e.g. e2, e4)
  promote <q|r|b|n> choose the piece for a pending promotion
  reset             start over from the initial position
  board             print the board
  moves             list legal moves for the side to move
  history           list moves played so far
  json              print the game snapshot as JSON
  quit              leave";

#[cfg(test)]
#[path = "command_tests.rs"]
mod command_tests;
