//! Long algebraic move text (`e2e4`, `e7e8q`) as used by the UCI protocol.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn move_to_long_algebraic(mv: &Move) -> String {
    let mut out = square_to_algebraic(mv.start);
    out.push_str(&square_to_algebraic(mv.end));
    if mv.is_promotion {
        out.push(mv.promotion_choice.letter().to_ascii_lowercase());
    }
    out
}

/// Resolves `long_algebraic` against the legal moves of `game_state`, so the
/// returned move carries the capture, castle and en-passant flags.
pub fn long_algebraic_to_move(long_algebraic: &str, game_state: &mut GameState) -> Result<Move, String> {
    if !long_algebraic.is_ascii() || !(4..=5).contains(&long_algebraic.len()) {
        return Err(format!("Invalid long algebraic move: {long_algebraic}"));
    }

    let from = algebraic_to_square(&long_algebraic[0..2])?;
    let to = algebraic_to_square(&long_algebraic[2..4])?;
    let promotion = long_algebraic[4..].chars().next().map(char_to_promotion).transpose()?;

    let candidate = legal_moves(game_state)
        .into_iter()
        .find(|mv| mv.start == from && mv.end == to)
        .ok_or_else(|| format!("Illegal move in this position: {long_algebraic}"))?;

    match (candidate.is_promotion, promotion) {
        (true, Some(kind)) => Ok(candidate.with_promotion(kind)),
        (true, None) => Err("Missing promotion piece in long algebraic move".to_owned()),
        (false, Some(_)) => Err("Only a pawn reaching the last rank may promote".to_owned()),
        (false, None) => Ok(candidate),
    }
}

fn char_to_promotion(ch: char) -> Result<PieceKind, String> {
    match ch {
        'q' => Ok(PieceKind::Queen),
        'r' => Ok(PieceKind::Rook),
        'b' => Ok(PieceKind::Bishop),
        'n' => Ok(PieceKind::Knight),
        _ => Err(format!("Invalid promotion piece: {ch}")),
    }
}
