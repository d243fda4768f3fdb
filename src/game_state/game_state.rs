//! Core board state representation.
//!
//! `GameState` owns the mailbox board, the side to move, cached king squares,
//! castling rights, the en-passant target and the two lock-step history
//! stacks used by make/undo. It is mutated only through
//! `move_generation::legal_move_apply`.

use crate::game_state::chess_rules::{home_row, pawn_start_row, BACK_RANK_LAYOUT};
use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub side_to_move: Color,

    // Cached, never derived by scanning; kept in sync by make/undo.
    pub white_king: Square,
    pub black_king: Square,

    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    // Lock-step stacks: entry `i` of `castling_history` holds the rights in
    // force before `move_history[i]` was made.
    pub move_history: Vec<Move>,
    pub castling_history: Vec<CastlingRights>,

    // Valid only right after the legal-move generation that produced them.
    pub checkmate: bool,
    pub stalemate: bool,

    // En-passant target supplied at setup; restored once history is empty.
    pub(crate) setup_en_passant: Option<Square>,
}

impl GameState {
    /// Standard initial position, White to move, all castling rights held.
    pub fn new_game() -> Self {
        let mut board: Board = [[None; 8]; 8];
        for color in [Color::White, Color::Black] {
            let back = home_row(color) as usize;
            let pawns = pawn_start_row(color) as usize;
            for (col, kind) in BACK_RANK_LAYOUT.iter().enumerate() {
                board[back][col] = Some(Piece::new(color, *kind));
                board[pawns][col] = Some(Piece::new(color, PieceKind::Pawn));
            }
        }

        Self {
            board,
            side_to_move: Color::White,
            white_king: Square::new(7, 4),
            black_king: Square::new(0, 4),
            castling_rights: CastlingRights::ALL,
            en_passant_square: None,
            move_history: Vec::new(),
            castling_history: Vec::new(),
            checkmate: false,
            stalemate: false,
            setup_en_passant: None,
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        parse_fen(fen)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.row as usize][square.col as usize]
    }

    #[inline]
    pub(crate) fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.board[square.row as usize][square.col as usize] = piece;
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    #[inline]
    pub(crate) fn set_king_square(&mut self, color: Color, square: Square) {
        match color {
            Color::White => self.white_king = square,
            Color::Black => self.black_king = square,
        }
    }

    /// Number of plies made since setup.
    #[inline]
    pub fn ply(&self) -> usize {
        self.move_history.len()
    }

    /// Compares everything make/undo must restore: board, side to move, king
    /// caches, castling rights and en-passant target.
    pub fn same_position(&self, other: &GameState) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.white_king == other.white_king
            && self.black_king == other.black_king
            && self.castling_rights == other.castling_rights
            && self.en_passant_square == other.en_passant_square
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;

    #[test]
    fn new_game_places_kings_and_caches_them() {
        let game = GameState::new_game();
        assert_eq!(
            game.piece_at(game.white_king),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            game.piece_at(game.black_king),
            Some(Piece::new(Color::Black, PieceKind::King))
        );
        assert_eq!(game.castling_rights, CastlingRights::ALL);
        assert!(game.move_history.is_empty());
        assert!(game.castling_history.is_empty());
    }

    #[test]
    fn new_game_matches_starting_fen() {
        let built = GameState::new_game();
        let parsed = GameState::from_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert!(built.same_position(&parsed));
    }

    #[test]
    fn middle_rows_start_empty() {
        let game = GameState::new_game();
        for row in 2..6 {
            for col in 0..8 {
                assert!(game.is_empty(Square::new(row, col)));
            }
        }
    }
}
