use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::Move;

/// Single-step movers (knight, king): each offset target on the board that
/// is not occupied by an ally.
#[inline]
pub fn push_step_moves(
    game_state: &GameState,
    from: Square,
    side: Color,
    offsets: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(d_row, d_col) in offsets {
        let Some(to) = from.offset(d_row, d_col) else {
            continue;
        };
        match game_state.piece_at(to) {
            Some(piece) if piece.color == side => {}
            _ => out.push(Move::new(from, to, &game_state.board)),
        }
    }
}

/// Sliders: walk each ray until the edge or a blocker. An enemy blocker is
/// included as a capture; an ally blocker is not.
#[inline]
pub fn push_ray_moves(
    game_state: &GameState,
    from: Square,
    side: Color,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(d_row, d_col) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(d_row, d_col) {
            match game_state.piece_at(to) {
                None => out.push(Move::new(from, to, &game_state.board)),
                Some(piece) => {
                    if piece.color != side {
                        out.push(Move::new(from, to, &game_state.board));
                    }
                    break;
                }
            }
            cursor = to;
        }
    }
}
