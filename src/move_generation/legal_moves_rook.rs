//! Rook move generation: orthogonal rays, stopping at (and capturing) the
//! first enemy piece.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_ray_moves;
use crate::moves::move_descriptions::Move;
use crate::moves::rook_moves::ROOK_DIRECTIONS;

pub fn generate_rook_moves(game_state: &GameState, from: Square, side: Color, out: &mut Vec<Move>) {
    push_ray_moves(game_state, from, side, &ROOK_DIRECTIONS, out);
}

#[cfg(test)]
mod tests {
    use super::generate_rook_moves;
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::GameState;

    #[test]
    fn rays_stop_at_blockers() {
        // Rook a1, own pawn a3, enemy knight c1.
        let game = GameState::from_fen("4k3/8/8/8/8/P7/8/R1n1K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_rook_moves(&game, Square::new(7, 0), Color::White, &mut out);

        let mut names: Vec<String> = out.iter().map(|mv| mv.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["Ra2", "Rb1", "Rxc1"]);
    }
}
