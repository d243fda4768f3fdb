//! Fixed-depth negamax engine.
//!
//! Wraps `search::negamax` with per-engine options and a seedable random
//! source. When the search produces no move the engine logs the anomaly and
//! plays a uniformly random legal move instead.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;
use crate::search::board_scoring::PositionalScorer;
use crate::search::negamax::{choose_move_with, SearchConfig, DEFAULT_SEARCH_DEPTH};

pub const MAX_ENGINE_DEPTH: u8 = 8;

pub struct NegamaxEngine {
    default_depth: u8,
    shuffle_moves: bool,
    seed: Option<u64>,
    rng: StdRng,
    stop_flag: Option<Arc<AtomicBool>>,
    move_generator: LegalMoveGenerator,
    scorer: PositionalScorer,
}

impl NegamaxEngine {
    pub fn new(default_depth: u8) -> Self {
        Self {
            default_depth: default_depth.clamp(1, MAX_ENGINE_DEPTH),
            shuffle_moves: true,
            seed: None,
            rng: StdRng::seed_from_u64(rand::random()),
            stop_flag: None,
            move_generator: LegalMoveGenerator,
            scorer: PositionalScorer,
        }
    }

    /// Shares a flag another thread can raise to end the current search.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn default_depth(&self) -> u8 {
        self.default_depth
    }

    fn reseed(&mut self) {
        self.rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
    }
}

impl Default for NegamaxEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEPTH)
    }
}

impl Engine for NegamaxEngine {
    fn name(&self) -> &str {
        "MailboxChess Negamax"
    }

    fn new_game(&mut self) {
        self.reseed();
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), String> {
        if name.eq_ignore_ascii_case("Depth") {
            let depth = value
                .parse::<u8>()
                .map_err(|_| format!("invalid Depth value: {value}"))?;
            if !(1..=MAX_ENGINE_DEPTH).contains(&depth) {
                return Err(format!("Depth must be in 1..={MAX_ENGINE_DEPTH}, got {depth}"));
            }
            self.default_depth = depth;
        } else if name.eq_ignore_ascii_case("Seed") {
            let seed = value
                .parse::<u64>()
                .map_err(|_| format!("invalid Seed value: {value}"))?;
            self.seed = Some(seed);
            self.reseed();
        } else if name.eq_ignore_ascii_case("Shuffle") {
            self.shuffle_moves = value
                .parse::<bool>()
                .map_err(|_| format!("invalid Shuffle value: {value}"))?;
        }
        Ok(())
    }

    fn choose_move(&mut self, game_state: &mut GameState, params: &GoParams) -> Result<EngineOutput, String> {
        let legal_moves = self.move_generator.generate_legal_moves(game_state);

        let mut out = EngineOutput::default();
        if legal_moves.is_empty() {
            out.info_lines
                .push("info string negamax_engine no_legal_moves".to_owned());
            return Ok(out);
        }

        let config = SearchConfig {
            depth: params.depth.unwrap_or(self.default_depth).min(MAX_ENGINE_DEPTH),
            shuffle_moves: self.shuffle_moves,
            movetime_ms: params.movetime_ms,
            stop_flag: self.stop_flag.clone(),
        };

        let result = choose_move_with(
            game_state,
            legal_moves.clone(),
            &self.move_generator,
            &self.scorer,
            &config,
            &mut self.rng,
        );

        out.info_lines.push(format!(
            "info depth {} score cp {} nodes {} time {}",
            config.depth, result.best_score, result.nodes, result.elapsed_ms
        ));
        if result.aborted {
            out.info_lines
                .push("info string negamax_engine search_stopped".to_owned());
        }

        out.best_move = match result.best_move {
            Some(mv) => Some(mv),
            None => {
                warn!(
                    depth = config.depth,
                    aborted = result.aborted,
                    legal_moves = legal_moves.len(),
                    "search yielded no move, playing a random legal move"
                );
                out.info_lines
                    .push("info string negamax_engine random_fallback".to_owned());
                legal_moves.as_slice().choose(&mut self.rng).copied()
            }
        };

        Ok(out)
    }
}
