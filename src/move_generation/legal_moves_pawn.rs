//! Pawn move generation.
//!
//! Single and double advances, diagonal captures, en passant, and the
//! promotion flag (Queen by default) on the far rank.

use crate::game_state::chess_rules::pawn_start_row;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::Move;
use crate::moves::pawn_moves::pawn_attack_squares;

pub fn generate_pawn_moves(game_state: &GameState, from: Square, side: Color, out: &mut Vec<Move>) {
    let forward = side.forward();

    if let Some(one_step) = from.offset(forward, 0) {
        if game_state.is_empty(one_step) {
            out.push(Move::new(from, one_step, &game_state.board));

            if from.row == pawn_start_row(side) {
                if let Some(two_step) = one_step.offset(forward, 0) {
                    if game_state.is_empty(two_step) {
                        out.push(Move::new(from, two_step, &game_state.board));
                    }
                }
            }
        }
    }

    for to in pawn_attack_squares(side, from) {
        match game_state.piece_at(to) {
            Some(piece) if piece.color != side => {
                out.push(Move::new(from, to, &game_state.board));
            }
            None if game_state.en_passant_square == Some(to) => {
                out.push(Move::en_passant(from, to, &game_state.board));
            }
            _ => {}
        }
    }
}
