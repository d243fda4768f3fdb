use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_ray_moves;
use crate::moves::move_descriptions::Move;
use crate::moves::queen_moves::QUEEN_DIRECTIONS;

pub fn generate_queen_moves(game_state: &GameState, from: Square, side: Color, out: &mut Vec<Move>) {
    push_ray_moves(game_state, from, side, &QUEEN_DIRECTIONS, out);
}
