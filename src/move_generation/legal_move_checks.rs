//! Attack and check detection.
//!
//! A square is attacked when some pseudo-legal move of the attacking side
//! lands on it. For pawns that means a push onto an empty square counts while
//! an empty diagonal does not, unless it is the en-passant target. Castling is
//! never an attack.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_piece_moves;

/// Whether the side to move's king is attacked.
#[inline]
pub fn is_in_check(game_state: &GameState) -> bool {
    is_king_in_check(game_state, game_state.side_to_move)
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    is_square_attacked_by(game_state, game_state.king_square(color), color.opposite())
}

/// Whether the opponent of the side to move attacks `square`.
#[inline]
pub fn is_square_attacked(game_state: &GameState, square: Square) -> bool {
    is_square_attacked_by(game_state, square, game_state.side_to_move.opposite())
}

pub fn is_square_attacked_by(game_state: &GameState, square: Square, attacker: Color) -> bool {
    let mut scratch = Vec::with_capacity(32);

    for (row, cells) in game_state.board.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let Some(piece) = cell else {
                continue;
            };
            if piece.color != attacker {
                continue;
            }

            scratch.clear();
            generate_piece_moves(game_state, Square::new(row as u8, col as u8), *piece, &mut scratch);
            if scratch.iter().any(|mv| mv.end == square) {
                return true;
            }
        }
    }

    false
}
