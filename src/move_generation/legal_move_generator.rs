//! Full legal move generation pipeline.
//!
//! Scans the board for the side to move, dispatches each piece to its
//! pseudo-legal generator, appends castling, then filters out every move that
//! leaves the mover's own king attacked by making and undoing it in place.
//! The same pass sets the checkmate / stalemate flags on the state.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{make_move, undo_last};
use crate::move_generation::legal_move_checks::{is_in_check, is_king_in_check};
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::{generate_castle_moves, generate_king_moves};
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &mut GameState) -> Vec<Move> {
        legal_moves(game_state)
    }
}

#[inline]
pub(crate) fn generate_piece_moves(game_state: &GameState, from: Square, piece: Piece, out: &mut Vec<Move>) {
    let side = piece.color;
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(game_state, from, side, out),
        PieceKind::Knight => generate_knight_moves(game_state, from, side, out),
        PieceKind::Bishop => generate_bishop_moves(game_state, from, side, out),
        PieceKind::Rook => generate_rook_moves(game_state, from, side, out),
        PieceKind::Queen => generate_queen_moves(game_state, from, side, out),
        PieceKind::King => generate_king_moves(game_state, from, side, out),
    }
}

/// Moves obeying piece movement rules for the side to move, in board scan
/// order. Castling is not included.
pub fn pseudo_legal_moves(game_state: &GameState) -> Vec<Move> {
    let side = game_state.side_to_move;
    let mut out = Vec::with_capacity(64);

    for (row, cells) in game_state.board.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(piece) = cell {
                if piece.color == side {
                    generate_piece_moves(game_state, Square::new(row as u8, col as u8), *piece, &mut out);
                }
            }
        }
    }

    out
}

/// Legal moves for the side to move. Refreshes `checkmate` / `stalemate`:
/// with no legal move the position is mate if the mover is in check and
/// stalemate otherwise.
pub fn legal_moves(game_state: &mut GameState) -> Vec<Move> {
    let mover = game_state.side_to_move;
    let mut moves = pseudo_legal_moves(game_state);
    generate_castle_moves(game_state, &mut moves);

    moves.retain(|mv| {
        make_move(game_state, *mv);
        let exposes_king = is_king_in_check(game_state, mover);
        undo_last(game_state);
        !exposes_king
    });

    if moves.is_empty() {
        let in_check = is_in_check(game_state);
        game_state.checkmate = in_check;
        game_state.stalemate = !in_check;
    } else {
        game_state.checkmate = false;
        game_state.stalemate = false;
    }

    moves
}
