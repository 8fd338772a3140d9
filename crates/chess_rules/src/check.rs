use crate::board::Board;
use crate::movegen::attack_set;
use crate::types::*;

/// True if any piece of color `by` has `target` in its attack set.
pub fn is_square_attacked(board: &Board, target: Position, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(from, _)| attack_set(board, from).contains(&target))
}

/// True if `color`'s king is attacked by the opponent.
///
/// # Panics
/// If `color` has no king on the board; kings are never removed in play, so a
/// missing one means the board invariant is already broken.
pub fn king_in_check(board: &Board, color: Color) -> bool {
    let ksq = board
        .king_position(color)
        .unwrap_or_else(|| panic!("board invariant broken: no {color} king"));
    is_square_attacked(board, ksq, color.opposite())
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod check_tests;
