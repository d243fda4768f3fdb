//! King move generation, including castling.
//!
//! Ordinary king steps are pseudo-legal and go through the regular
//! self-check filter. Castling is only appended by the legal generator: it
//! needs attack information and must never count as an attack itself.

use crate::game_state::chess_rules::{home_row, KING_SIDE_ROOK_COL, KING_START_COL, QUEEN_SIDE_ROOK_COL};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked_by;
use crate::move_generation::legal_move_shared::push_step_moves;
use crate::moves::king_moves::KING_OFFSETS;
use crate::moves::move_descriptions::Move;

pub fn generate_king_moves(game_state: &GameState, from: Square, side: Color, out: &mut Vec<Move>) {
    push_step_moves(game_state, from, side, &KING_OFFSETS, out);
}

/// Appends the castling moves available to the side to move.
///
/// Requires the right to still be held, king and rook on their home squares,
/// every square strictly between them empty, and neither the king's square
/// nor the squares it crosses attacked.
pub fn generate_castle_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let rights = game_state.castling_rights;
    if !rights.king_side(side) && !rights.queen_side(side) {
        return;
    }

    let row = home_row(side);
    let king = game_state.king_square(side);
    if king != Square::new(row, KING_START_COL) {
        return;
    }

    let enemy = side.opposite();
    if is_square_attacked_by(game_state, king, enemy) {
        return;
    }

    if rights.king_side(side)
        && has_home_rook(game_state, side, KING_SIDE_ROOK_COL)
        && path_is_clear(game_state, row, KING_START_COL + 1..KING_SIDE_ROOK_COL)
        && path_is_safe(game_state, row, [KING_START_COL + 1, KING_START_COL + 2], enemy)
    {
        out.push(Move::castle(king, Square::new(row, KING_START_COL + 2), &game_state.board));
    }

    if rights.queen_side(side)
        && has_home_rook(game_state, side, QUEEN_SIDE_ROOK_COL)
        && path_is_clear(game_state, row, QUEEN_SIDE_ROOK_COL + 1..KING_START_COL)
        && path_is_safe(game_state, row, [KING_START_COL - 1, KING_START_COL - 2], enemy)
    {
        out.push(Move::castle(king, Square::new(row, KING_START_COL - 2), &game_state.board));
    }
}

#[inline]
fn has_home_rook(game_state: &GameState, side: Color, col: u8) -> bool {
    game_state.piece_at(Square::new(home_row(side), col)) == Some(Piece::new(side, PieceKind::Rook))
}

#[inline]
fn path_is_clear(game_state: &GameState, row: u8, cols: std::ops::Range<u8>) -> bool {
    cols.into_iter().all(|col| game_state.is_empty(Square::new(row, col)))
}

/// "Attacked" here is the pseudo-legal reach of the enemy, so an enemy pawn
/// pushing onto a crossed square blocks castling and one merely diagonal to
/// it does not.
#[inline]
fn path_is_safe(game_state: &GameState, row: u8, crossed: [u8; 2], enemy: Color) -> bool {
    crossed
        .into_iter()
        .all(|col| !is_square_attacked_by(game_state, Square::new(row, col), enemy))
}
