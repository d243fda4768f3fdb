//! Pawn capture geometry.

use crate::game_state::chess_types::{Color, Square};

/// Column deltas of the two diagonal capture squares.
pub const PAWN_CAPTURE_COLS: [i8; 2] = [-1, 1];

/// Squares a pawn of `color` on `from` attacks, whether or not they are
/// occupied.
#[inline]
pub fn pawn_attack_squares(color: Color, from: Square) -> impl Iterator<Item = Square> {
    PAWN_CAPTURE_COLS
        .into_iter()
        .filter_map(move |d_col| from.offset(color.forward(), d_col))
}
