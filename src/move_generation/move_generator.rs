use std::error::Error;
use std::fmt;

use crate::game_state::chess_types::PieceKind;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::Move;

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveGenerationError {
    /// No legal move of the side to move has this identity.
    IllegalMove(String),
    /// The requested piece is not a legal promotion target.
    InvalidPromotion(PieceKind),
}

impl fmt::Display for MoveGenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveGenerationError::IllegalMove(mv) => write!(f, "illegal move: {mv}"),
            MoveGenerationError::InvalidPromotion(kind) => {
                write!(f, "cannot promote to {kind:?}")
            }
        }
    }
}

impl Error for MoveGenerationError {}

/// Source of legal moves for search and perft. Generation makes and undoes
/// candidate moves in place, so it needs the state mutably, but it always
/// leaves the position as it found it apart from the checkmate / stalemate
/// flags.
pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, game_state: &mut GameState) -> Vec<Move>;
}
