//! Pluggable board evaluation.
//!
//! Search delegates static scoring to `BoardScorer`, so alternate heuristics
//! can be swapped without touching the search code. Scores are always from
//! White's point of view; search converts them with the mover's sign.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Score of a checkmated position, signed against the mated side.
pub const CHECKMATE_SCORE: i32 = 1000;
pub const STALEMATE_SCORE: i32 = 0;

pub trait BoardScorer: Send + Sync {
    /// White-positive score of `game_state`.
    fn score(&self, game_state: &GameState) -> i32;
}

type Table = [[i32; 8]; 8];

const KNIGHT_TABLE: Table = [
    [-4, -2, 0, -2, -2, 0, -2, -4],
    [-2, 0, 0, 0, 0, 0, 0, -2],
    [-2, 1, 0, 1, 1, 0, 0, -2],
    [0, 1, 1, 2, 2, 1, 1, 0],
    [0, 1, 1, 2, 2, 1, 1, 0],
    [-2, 0, 0, 1, 1, 0, 0, -2],
    [-2, 0, 0, 0, 0, 0, 0, -2],
    [-4, -2, 0, -2, -2, 0, -2, -4],
];

const ROOK_TABLE: Table = [
    [0, 0, 0, 2, 2, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 2, 2, 0, 0, 0],
];

const BISHOP_TABLE: Table = [
    [-2, 0, 0, 0, 0, 0, 0, -2],
    [0, 2, 0, 1, 1, 0, 2, 0],
    [0, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 3, 2, 2, 3, 0, 0],
    [0, 0, 3, 2, 2, 3, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 0],
    [0, 2, 0, 1, 1, 0, 2, 0],
    [-2, 0, 0, 0, 0, 0, 0, -2],
];

const QUEEN_TABLE: Table = [
    [-4, 0, 0, 0, 0, 0, 0, -4],
    [-1, 0, 1, 0, 0, 0, 0, -1],
    [-1, 1, 0, 0, 0, 0, 0, -1],
    [1, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0],
    [-1, 1, 0, 0, 0, 0, 0, -1],
    [-1, 0, 1, 0, 0, 0, 0, -1],
    [-4, 0, 0, 0, 0, 0, 0, -4],
];

// White's view; Black reads the row mirrored.
const PAWN_TABLE: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [6, 6, 6, 6, 6, 6, 6, 6],
    [3, 3, 3, 3, 3, 3, 3, 3],
    [0, 0, 0, 3, 3, 0, 0, 0],
    [0, 0, 2, 3, 3, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 0, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const KING_TABLE: Table = [
    [-6, -6, -6, -6, -6, -6, -6, -6],
    [-5, -5, -5, -5, -5, -5, -5, -5],
    [-4, -4, -4, -4, -4, -4, -4, -4],
    [-3, -3, -3, -3, -3, -3, -3, -3],
    [-2, -2, -2, -2, -2, -2, -2, -2],
    [-1, -1, -1, -1, -1, -1, -1, -1],
    [1, 0, -1, 0, 0, -1, 0, 1],
    [2, 3, 0, 0, 0, 0, 3, 2],
];

/// Material plus piece-square bonuses, with fixed checkmate / stalemate
/// scores taken from the flags left by the last legal-move generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalScorer;

impl PositionalScorer {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 2,
            PieceKind::Knight => 8,
            PieceKind::Bishop => 8,
            PieceKind::Rook => 12,
            PieceKind::Queen => 24,
            PieceKind::King => 0,
        }
    }

    #[inline]
    pub fn square_bonus(piece: Piece, square: Square) -> i32 {
        let col = square.col as usize;
        let row = square.row as usize;
        let mirrored = match piece.color {
            Color::White => row,
            Color::Black => 7 - row,
        };

        match piece.kind {
            PieceKind::Pawn => PAWN_TABLE[mirrored][col],
            PieceKind::King => KING_TABLE[mirrored][col],
            PieceKind::Knight => KNIGHT_TABLE[row][col],
            PieceKind::Bishop => BISHOP_TABLE[row][col],
            PieceKind::Rook => ROOK_TABLE[row][col],
            PieceKind::Queen => QUEEN_TABLE[row][col],
        }
    }

    fn material_and_position_white_minus_black(game_state: &GameState) -> i32 {
        let mut score = 0i32;
        for (row, cells) in game_state.board.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let Some(piece) = cell else {
                    continue;
                };
                let square = Square::new(row as u8, col as u8);
                let contribution = Self::piece_value(piece.kind) + Self::square_bonus(*piece, square);
                score += piece.color.sign() * contribution;
            }
        }
        score
    }
}

impl BoardScorer for PositionalScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        if game_state.checkmate {
            return -game_state.side_to_move.sign() * CHECKMATE_SCORE;
        }
        if game_state.stalemate {
            return STALEMATE_SCORE;
        }
        Self::material_and_position_white_minus_black(game_state)
    }
}
