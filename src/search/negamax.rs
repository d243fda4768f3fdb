//! Fixed-depth negamax with alpha-beta pruning.
//!
//! The move list is shuffled at every interior node (when enabled) so equal
//! scores do not always resolve to the same move. The random source is
//! supplied by the caller, which makes searches reproducible under a seeded
//! generator. The best root move travels back in `SearchResult` rather than
//! through shared state, so searches are reentrant.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, undo_last};
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::{BoardScorer, PositionalScorer, CHECKMATE_SCORE};

/// Alpha-beta window bound. Strictly more extreme than any evaluation.
pub const SEARCH_INFINITY: i32 = 1_000_000;
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

const _: () = assert!(CHECKMATE_SCORE < SEARCH_INFINITY);

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub depth: u8,
    pub shuffle_moves: bool,
    pub movetime_ms: Option<u64>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            shuffle_moves: true,
            movetime_ms: None,
            stop_flag: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResult {
    /// `None` when the root had no moves, depth was zero, or the search was
    /// stopped before any root move finished.
    pub best_move: Option<Move>,
    /// Score from the side to move's point of view.
    pub best_score: i32,
    pub nodes: u64,
    pub aborted: bool,
    pub elapsed_ms: u64,
}

/// Searches `legal_moves` (the current legal moves of `game_state`) with the
/// default generator and evaluator.
pub fn choose_move<R: Rng + ?Sized>(
    game_state: &mut GameState,
    legal_moves: Vec<Move>,
    config: &SearchConfig,
    rng: &mut R,
) -> SearchResult {
    choose_move_with(
        game_state,
        legal_moves,
        &LegalMoveGenerator,
        &PositionalScorer,
        config,
        rng,
    )
}

pub fn choose_move_with<G: MoveGenerator, S: BoardScorer, R: Rng + ?Sized>(
    game_state: &mut GameState,
    legal_moves: Vec<Move>,
    generator: &G,
    scorer: &S,
    config: &SearchConfig,
    rng: &mut R,
) -> SearchResult {
    let started = Instant::now();
    let mut search = Search {
        generator,
        scorer,
        rng,
        shuffle_moves: config.shuffle_moves,
        deadline: config
            .movetime_ms
            .map(|ms| started + Duration::from_millis(ms)),
        stop_flag: config.stop_flag.as_deref(),
        nodes: 0,
        aborted: false,
    };

    let (best_move, best_score) = search.root(game_state, legal_moves, config.depth);
    let result = SearchResult {
        best_move,
        best_score,
        nodes: search.nodes,
        aborted: search.aborted,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };

    debug!(
        depth = config.depth,
        nodes = result.nodes,
        score = result.best_score,
        aborted = result.aborted,
        best_move = ?result.best_move.map(|mv| mv.to_string()),
        "search finished"
    );

    result
}

struct Search<'a, G, S, R: ?Sized> {
    generator: &'a G,
    scorer: &'a S,
    rng: &'a mut R,
    shuffle_moves: bool,
    deadline: Option<Instant>,
    stop_flag: Option<&'a AtomicBool>,
    nodes: u64,
    aborted: bool,
}

impl<G: MoveGenerator, S: BoardScorer, R: Rng + ?Sized> Search<'_, G, S, R> {
    fn root(&mut self, game_state: &mut GameState, mut moves: Vec<Move>, depth: u8) -> (Option<Move>, i32) {
        self.nodes += 1;
        let turn_sign = game_state.side_to_move.sign();

        if depth == 0 || moves.is_empty() {
            return (None, turn_sign * self.scorer.score(game_state));
        }

        if self.shuffle_moves {
            moves.shuffle(&mut *self.rng);
        }

        let mut alpha = -SEARCH_INFINITY;
        let beta = SEARCH_INFINITY;
        let mut best_move = None;
        let mut best_score = -SEARCH_INFINITY;

        for mv in moves {
            if self.should_stop() {
                break;
            }

            make_move(game_state, mv);
            let replies = self.generator.generate_legal_moves(game_state);
            let score = -self.negamax(game_state, replies, depth - 1, -beta, -alpha, -turn_sign);
            undo_last(game_state);

            // A root move whose subtree was cut short has no trustworthy score.
            if self.aborted {
                break;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(best_score);
        }

        (best_move, best_score)
    }

    fn negamax(
        &mut self,
        game_state: &mut GameState,
        mut moves: Vec<Move>,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        turn_sign: i32,
    ) -> i32 {
        self.nodes += 1;
        if self.should_stop() {
            return 0;
        }

        // Checkmate / stalemate flags were set when `moves` was generated.
        if depth == 0 || moves.is_empty() {
            return turn_sign * self.scorer.score(game_state);
        }

        if self.shuffle_moves {
            moves.shuffle(&mut *self.rng);
        }

        let mut max_score = -SEARCH_INFINITY;
        for mv in moves {
            make_move(game_state, mv);
            let replies = self.generator.generate_legal_moves(game_state);
            let score = -self.negamax(game_state, replies, depth - 1, -beta, -alpha, -turn_sign);
            undo_last(game_state);

            if self.aborted {
                return max_score;
            }

            max_score = max_score.max(score);
            alpha = alpha.max(max_score);
            if alpha >= beta {
                break;
            }
        }

        max_score
    }

    #[inline]
    fn should_stop(&mut self) -> bool {
        if !self.aborted {
            let stopped = self
                .stop_flag
                .is_some_and(|flag| flag.load(Ordering::Relaxed));
            let expired = self.deadline.is_some_and(|deadline| Instant::now() >= deadline);
            self.aborted = stopped || expired;
        }
        self.aborted
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::move_generation::legal_move_generator::legal_moves;

    /// Plain negamax over every move in generation order, no pruning.
    fn full_width_negamax(game_state: &mut GameState, moves: Vec<Move>, depth: u8, turn_sign: i32) -> i32 {
        if depth == 0 || moves.is_empty() {
            return turn_sign * PositionalScorer.score(game_state);
        }
        let mut best = -SEARCH_INFINITY;
        for mv in moves {
            make_move(game_state, mv);
            let replies = legal_moves(game_state);
            let score = -full_width_negamax(game_state, replies, depth - 1, -turn_sign);
            undo_last(game_state);
            best = best.max(score);
        }
        best
    }

    fn fixed_order(depth: u8) -> SearchConfig {
        SearchConfig {
            depth,
            shuffle_moves: false,
            ..SearchConfig::default()
        }
    }

    fn assert_pruned_matches_full_width(fen: &str, depth: u8) {
        let mut game = GameState::from_fen(fen).expect("FEN should parse");
        let before = game.clone();
        let moves = legal_moves(&mut game);
        let turn_sign = game.side_to_move.sign();

        let reference = full_width_negamax(&mut game, moves.clone(), depth, turn_sign);
        let mut rng = StdRng::seed_from_u64(7);
        let pruned = choose_move(&mut game, moves, &fixed_order(depth), &mut rng);

        assert_eq!(pruned.best_score, reference, "pruned and full-width disagree on {fen}");
        assert!(pruned.best_move.is_some());
        assert!(game.same_position(&before), "search must restore the position");
    }

    #[test]
    fn pruned_search_matches_full_width_search() {
        assert_pruned_matches_full_width("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 2);
        assert_pruned_matches_full_width(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            2,
        );
        assert_pruned_matches_full_width("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3);
        assert_pruned_matches_full_width("4k3/8/8/3q4/8/2N5/8/4K3 b - - 0 1", 3);
    }

    #[test]
    fn shuffled_search_is_reproducible_with_the_same_seed() {
        let config = SearchConfig {
            depth: 2,
            ..SearchConfig::default()
        };

        let mut first_game = GameState::new_game();
        let first_moves = legal_moves(&mut first_game);
        let first = choose_move(&mut first_game, first_moves, &config, &mut StdRng::seed_from_u64(42));

        let mut second_game = GameState::new_game();
        let second_moves = legal_moves(&mut second_game);
        let second = choose_move(&mut second_game, second_moves, &config, &mut StdRng::seed_from_u64(42));

        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.best_score, second.best_score);
        assert_eq!(first.nodes, second.nodes);
    }

    #[test]
    fn shuffling_does_not_change_the_root_score() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let mut game = GameState::from_fen(fen).expect("FEN should parse");
        let moves = legal_moves(&mut game);

        let fixed = choose_move(&mut game, moves.clone(), &fixed_order(2), &mut StdRng::seed_from_u64(1));
        let shuffled_config = SearchConfig {
            depth: 2,
            ..SearchConfig::default()
        };
        let shuffled = choose_move(&mut game, moves, &shuffled_config, &mut StdRng::seed_from_u64(99));

        assert_eq!(fixed.best_score, shuffled.best_score);
    }

    #[test]
    fn finds_mate_in_one() {
        let mut game = GameState::from_fen("6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1").expect("FEN should parse");
        let moves = legal_moves(&mut game);
        let mut rng = StdRng::seed_from_u64(3);

        let result = choose_move(&mut game, moves, &fixed_order(1), &mut rng);
        assert_eq!(result.best_score, CHECKMATE_SCORE);

        let best = result.best_move.expect("a mating move should be chosen");
        make_move(&mut game, best);
        assert!(legal_moves(&mut game).is_empty());
        assert!(game.checkmate);
    }

    #[test]
    fn deeper_search_still_sees_the_mate() {
        let mut game = GameState::from_fen("6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1").expect("FEN should parse");
        let moves = legal_moves(&mut game);
        let result = choose_move(&mut game, moves, &SearchConfig::default(), &mut StdRng::seed_from_u64(5));
        assert_eq!(result.best_score, CHECKMATE_SCORE);
    }

    #[test]
    fn black_to_move_takes_the_hanging_queen() {
        let mut game = GameState::from_fen("3r3k/8/8/8/8/8/3Q4/7K b - - 0 1").expect("FEN should parse");
        let moves = legal_moves(&mut game);
        let result = choose_move(&mut game, moves, &fixed_order(1), &mut StdRng::seed_from_u64(11));

        let best = result.best_move.expect("a move should be chosen");
        assert_eq!(best.to_string(), "Rxd2");
        assert!(result.best_score > 0);
    }

    #[test]
    fn depth_zero_returns_static_score_without_a_move() {
        let mut game = GameState::new_game();
        let moves = legal_moves(&mut game);
        let result = choose_move(&mut game, moves, &fixed_order(0), &mut StdRng::seed_from_u64(0));
        assert_eq!(result.best_move, None);
        assert_eq!(result.best_score, 0);
    }

    #[test]
    fn no_moves_yields_no_best_move() {
        let mut game = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        let moves = legal_moves(&mut game);
        let result = choose_move(&mut game, moves, &SearchConfig::default(), &mut StdRng::seed_from_u64(0));
        assert_eq!(result.best_move, None);
        assert_eq!(result.best_score, 0);
    }

    #[test]
    fn raised_stop_flag_aborts_before_any_root_move() {
        let mut game = GameState::new_game();
        let before = game.clone();
        let moves = legal_moves(&mut game);
        let config = SearchConfig {
            stop_flag: Some(Arc::new(AtomicBool::new(true))),
            ..SearchConfig::default()
        };

        let result = choose_move(&mut game, moves, &config, &mut StdRng::seed_from_u64(0));
        assert!(result.aborted);
        assert_eq!(result.best_move, None);
        assert!(game.same_position(&before));
        assert!(game.move_history.is_empty());
    }

    #[test]
    fn expired_deadline_aborts_and_restores_the_position() {
        let mut game = GameState::new_game();
        let before = game.clone();
        let moves = legal_moves(&mut game);
        let config = SearchConfig {
            depth: 4,
            movetime_ms: Some(0),
            ..SearchConfig::default()
        };

        let result = choose_move(&mut game, moves, &config, &mut StdRng::seed_from_u64(0));
        assert!(result.aborted);
        assert!(game.same_position(&before));
        assert!(game.castling_history.is_empty());
    }
}
