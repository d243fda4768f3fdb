//! Make / undo of moves on a `GameState`.
//!
//! `make_move` trusts its input and is what search and the legal filter use.
//! `apply_move` is the checked entry point for external callers: the move
//! must match one of the current legal moves, and a promotion choice must be
//! a legal target.

use crate::game_state::chess_rules::{home_row, KING_SIDE_ROOK_COL, QUEEN_SIDE_ROOK_COL};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::move_descriptions::Move;

/// Plays `mv` without validation. The move must come from the legal (or
/// pseudo-legal) generator for the current position.
pub fn make_move(game_state: &mut GameState, mv: Move) {
    let mover = mv.piece_moved.color;
    debug_assert_eq!(mover, game_state.side_to_move);

    game_state.castling_history.push(game_state.castling_rights);
    game_state.move_history.push(mv);

    game_state.set_piece(mv.start, None);
    game_state.set_piece(mv.end, Some(mv.piece_placed()));

    if mv.piece_moved.kind == PieceKind::King {
        game_state.set_king_square(mover, mv.end);
    }

    if mv.is_en_passant {
        // The bypassed pawn sits on the mover's start row, in the end column.
        game_state.set_piece(Square::new(mv.start.row, mv.end.col), None);
    }

    if mv.is_castle {
        let (rook_from, rook_to) = castle_rook_squares(&mv);
        let rook = game_state.piece_at(rook_from);
        game_state.set_piece(rook_from, None);
        game_state.set_piece(rook_to, rook);
    }

    game_state.en_passant_square = mv.skipped_square();
    update_castling_rights(&mut game_state.castling_rights, &mv);

    game_state.side_to_move = mover.opposite();
    game_state.checkmate = false;
    game_state.stalemate = false;
}

/// Reverts the most recent move. Does nothing when no move has been made.
pub fn undo_last(game_state: &mut GameState) {
    let Some(mv) = game_state.move_history.pop() else {
        return;
    };
    let previous_rights = game_state.castling_history.pop();
    debug_assert!(previous_rights.is_some(), "history stacks out of step");

    game_state.set_piece(mv.start, Some(mv.piece_moved));
    if mv.is_en_passant {
        game_state.set_piece(mv.end, None);
        game_state.set_piece(Square::new(mv.start.row, mv.end.col), mv.piece_captured);
    } else {
        game_state.set_piece(mv.end, mv.piece_captured);
    }

    if mv.is_castle {
        let (rook_from, rook_to) = castle_rook_squares(&mv);
        let rook = game_state.piece_at(rook_to);
        game_state.set_piece(rook_to, None);
        game_state.set_piece(rook_from, rook);
    }

    if mv.piece_moved.kind == PieceKind::King {
        game_state.set_king_square(mv.piece_moved.color, mv.start);
    }

    game_state.side_to_move = mv.piece_moved.color;
    if let Some(rights) = previous_rights {
        game_state.castling_rights = rights;
    }

    game_state.en_passant_square = match game_state.move_history.last() {
        Some(prior) => prior.skipped_square(),
        None => game_state.setup_en_passant,
    };

    game_state.checkmate = false;
    game_state.stalemate = false;
}

/// Checked make: finds the legal move with the same identity as `mv`, carries
/// over the caller's promotion choice and plays it. On error the state is
/// left as it was.
pub fn apply_move(game_state: &mut GameState, mv: Move) -> MoveGenResult<()> {
    let candidates = legal_moves(game_state);
    let Some(mut chosen) = candidates.into_iter().find(|legal| legal.same_identity(&mv)) else {
        return Err(MoveGenerationError::IllegalMove(format!("{mv}")));
    };

    if chosen.is_promotion {
        if !mv.promotion_choice.is_promotion_target() {
            return Err(MoveGenerationError::InvalidPromotion(mv.promotion_choice));
        }
        chosen.promotion_choice = mv.promotion_choice;
    }

    make_move(game_state, chosen);
    Ok(())
}

/// Rook origin and destination for a castling move.
#[inline]
fn castle_rook_squares(mv: &Move) -> (Square, Square) {
    let row = mv.end.row;
    if mv.is_king_side_castle() {
        (Square::new(row, mv.end.col + 1), Square::new(row, mv.end.col - 1))
    } else {
        (Square::new(row, mv.end.col - 2), Square::new(row, mv.end.col + 1))
    }
}

fn update_castling_rights(rights: &mut CastlingRights, mv: &Move) {
    let mover = mv.piece_moved.color;

    match mv.piece_moved.kind {
        PieceKind::King => rights.revoke_both(mover),
        PieceKind::Rook => revoke_for_rook_square(rights, mover, mv.start),
        _ => {}
    }

    // A rook captured on its home square takes the opponent's right with it.
    if let Some(captured) = mv.piece_captured {
        if captured.kind == PieceKind::Rook {
            revoke_for_rook_square(rights, captured.color, mv.end);
        }
    }
}

#[inline]
fn revoke_for_rook_square(rights: &mut CastlingRights, owner: Color, square: Square) {
    if square.row != home_row(owner) {
        return;
    }
    match square.col {
        KING_SIDE_ROOK_COL => rights.revoke_king_side(owner),
        QUEEN_SIDE_ROOK_COL => rights.revoke_queen_side(owner),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use rand::prelude::IndexedRandom;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn mv(game: &GameState, from: &str, to: &str) -> Move {
        let start = algebraic_to_square(from).expect("valid square");
        let end = algebraic_to_square(to).expect("valid square");
        Move::new(start, end, &game.board)
    }

    #[test]
    fn double_push_sets_en_passant_target_and_undo_clears_it() {
        let mut game = GameState::new_game();
        let before = game.clone();

        let push = mv(&game, "e2", "e4");
        apply_move(&mut game, push).expect("e2e4 is legal");
        assert_eq!(game.en_passant_square, Some(Square::new(5, 4)));
        assert_eq!(game.side_to_move, Color::Black);
        assert_eq!(game.ply(), 1);

        undo_last(&mut game);
        assert!(game.same_position(&before));
        assert!(game.move_history.is_empty());
    }

    #[test]
    fn en_passant_removes_the_bypassed_pawn_and_undo_restores_it() {
        let mut game = GameState::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").expect("FEN should parse");
        let played = mv(&game, "d7", "d5");
        apply_move(&mut game, played).expect("d7d5 is legal");
        assert_eq!(game.en_passant_square, Some(Square::new(2, 3)));

        let before_capture = game.clone();
        let capture = Move::en_passant(Square::new(3, 4), Square::new(2, 3), &game.board);
        apply_move(&mut game, capture).expect("exd6 is legal");
        assert!(game.is_empty(Square::new(3, 3)));
        assert_eq!(game.en_passant_square, None);

        undo_last(&mut game);
        assert!(game.same_position(&before_capture));
        assert_eq!(game.piece_at(Square::new(3, 3)), Some(Piece::new(Color::Black, PieceKind::Pawn)));
    }

    #[test]
    fn en_passant_expires_after_one_ply() {
        let mut game = GameState::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").expect("FEN should parse");
        let played = mv(&game, "d7", "d5");
        apply_move(&mut game, played).expect("d7d5 is legal");
        let played = mv(&game, "e1", "f1");
        apply_move(&mut game, played).expect("Kf1 is legal");
        let played = mv(&game, "e8", "f8");
        apply_move(&mut game, played).expect("Kf8 is legal");

        let moves = legal_moves(&mut game);
        assert!(moves.iter().all(|m| !m.is_en_passant));
    }

    #[test]
    fn undo_to_setup_restores_the_fen_en_passant_target() {
        let mut game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let before = game.clone();
        let played = mv(&game, "e1", "d1");
        apply_move(&mut game, played).expect("Kd1 is legal");
        assert_eq!(game.en_passant_square, None);

        undo_last(&mut game);
        assert!(game.same_position(&before));
        assert_eq!(game.en_passant_square, Some(Square::new(2, 3)));
    }

    #[test]
    fn castling_moves_the_rook_and_undo_puts_it_back() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let before = game.clone();

        let short = Move::castle(Square::new(7, 4), Square::new(7, 6), &game.board);
        apply_move(&mut game, short).expect("O-O is legal");
        assert_eq!(game.piece_at(Square::new(7, 5)), Some(Piece::new(Color::White, PieceKind::Rook)));
        assert!(game.is_empty(Square::new(7, 7)));
        assert_eq!(game.white_king, Square::new(7, 6));
        assert!(!game.castling_rights.king_side(Color::White));
        assert!(!game.castling_rights.queen_side(Color::White));
        assert!(game.castling_rights.king_side(Color::Black));

        let long = Move::castle(Square::new(0, 4), Square::new(0, 2), &game.board);
        apply_move(&mut game, long).expect("O-O-O is legal");
        assert_eq!(game.piece_at(Square::new(0, 3)), Some(Piece::new(Color::Black, PieceKind::Rook)));
        assert!(game.is_empty(Square::new(0, 0)));
        assert_eq!(game.castling_rights, CastlingRights::NONE);

        undo_last(&mut game);
        undo_last(&mut game);
        assert!(game.same_position(&before));
    }

    #[test]
    fn capturing_a_home_rook_revokes_the_opponent_right() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let played = mv(&game, "a1", "a8");
        apply_move(&mut game, played).expect("Rxa8 is legal");

        assert!(!game.castling_rights.queen_side(Color::White));
        assert!(!game.castling_rights.queen_side(Color::Black));
        assert!(game.castling_rights.king_side(Color::White));
        assert!(game.castling_rights.king_side(Color::Black));
    }

    #[test]
    fn castling_rights_never_come_back_during_play() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let sequence = [("h1", "h2"), ("a8", "a7"), ("h2", "h1"), ("a7", "a8")];
        let mut previous = game.castling_rights;

        for (from, to) in sequence {
            let played = mv(&game, from, to);
            apply_move(&mut game, played).expect("rook shuffle is legal");
            let now = game.castling_rights;
            for color in [Color::White, Color::Black] {
                assert!(previous.king_side(color) || !now.king_side(color));
                assert!(previous.queen_side(color) || !now.queen_side(color));
            }
            previous = now;
        }

        assert!(!game.castling_rights.king_side(Color::White));
        assert!(!game.castling_rights.queen_side(Color::Black));
    }

    #[test]
    fn promotion_honours_the_requested_piece() {
        let mut game = GameState::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        let before = game.clone();
        let promote = mv(&game, "a7", "a8").with_promotion(PieceKind::Knight);

        apply_move(&mut game, promote).expect("a8=N is legal");
        assert_eq!(game.piece_at(Square::new(0, 0)), Some(Piece::new(Color::White, PieceKind::Knight)));

        undo_last(&mut game);
        assert!(game.same_position(&before));
        assert_eq!(game.piece_at(Square::new(1, 0)), Some(Piece::new(Color::White, PieceKind::Pawn)));
    }

    #[test]
    fn promotion_to_king_is_rejected_without_side_effects() {
        let mut game = GameState::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        let before = game.clone();
        let promote = mv(&game, "a7", "a8").with_promotion(PieceKind::King);

        let err = apply_move(&mut game, promote).expect_err("king is not a promotion target");
        assert_eq!(err, MoveGenerationError::InvalidPromotion(PieceKind::King));
        assert!(game.same_position(&before));
        assert_eq!(game.ply(), 0);
    }

    #[test]
    fn illegal_move_is_rejected_without_side_effects() {
        let mut game = GameState::new_game();
        let before = game.clone();
        let jump = mv(&game, "e2", "e5");

        assert!(matches!(apply_move(&mut game, jump), Err(MoveGenerationError::IllegalMove(_))));
        assert!(game.same_position(&before));
    }

    #[test]
    fn every_legal_move_is_undone_exactly() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/Pp2P3/2N2Q1p/1PPBBPPP/R3K2R b KQkq a3 0 1",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        ];

        for fen in fens {
            let mut game = GameState::from_fen(fen).expect("FEN should parse");
            let before = game.clone();
            for candidate in legal_moves(&mut game) {
                make_move(&mut game, candidate);
                undo_last(&mut game);
                assert!(game.same_position(&before), "{candidate} was not undone cleanly in {fen}");
            }
        }
    }

    #[test]
    fn random_game_undoes_cleanly_at_every_ply() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut game = GameState::new_game();

        for _ in 0..40 {
            let moves = legal_moves(&mut game);
            let Some(&chosen) = moves.choose(&mut rng) else {
                break;
            };

            let before = game.clone();
            for candidate in &moves {
                make_move(&mut game, *candidate);
                undo_last(&mut game);
                assert!(game.same_position(&before), "{candidate} was not undone cleanly");
            }

            make_move(&mut game, chosen);
        }

        while game.ply() > 0 {
            undo_last(&mut game);
        }
        assert!(game.same_position(&GameState::new_game()));
    }

    #[test]
    fn undo_on_empty_history_is_a_no_op() {
        let mut game = GameState::new_game();
        let before = game.clone();
        undo_last(&mut game);
        assert!(game.same_position(&before));
    }
}
