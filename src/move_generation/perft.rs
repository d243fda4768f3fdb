//! Perft: exhaustive legal-move tree counts used to validate generation and
//! make/undo.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, undo_last};
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::move_generator::MoveGenerator;
use crate::utils::long_algebraic::move_to_long_algebraic;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Counts leaf nodes `depth` plies below `game_state`, with per-leaf move
/// statistics. The state is restored before returning.
pub fn perft<G: MoveGenerator>(generator: &G, game_state: &mut GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for mv in generator.generate_legal_moves(game_state) {
        make_move(game_state, mv);
        if depth == 1 {
            total.nodes += 1;
            total.captures += usize::from(mv.is_capture());
            total.en_passant += usize::from(mv.is_en_passant);
            total.castles += usize::from(mv.is_castle);
            total.promotions += usize::from(mv.is_promotion);
            if is_in_check(game_state) {
                total.checks += 1;
                if generator.generate_legal_moves(game_state).is_empty() {
                    total.checkmates += 1;
                }
            }
        } else {
            total.merge(perft(generator, game_state, depth - 1));
        }
        undo_last(game_state);
    }

    total
}

/// Per-root-move node counts, in generation order.
pub fn perft_divide<G: MoveGenerator>(generator: &G, game_state: &mut GameState, depth: u8) -> Vec<(String, usize)> {
    if depth == 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for mv in generator.generate_legal_moves(game_state) {
        make_move(game_state, mv);
        let nodes = perft(generator, game_state, depth - 1).nodes;
        undo_last(game_state);
        out.push((move_to_long_algebraic(&mv), nodes));
    }
    out
}
