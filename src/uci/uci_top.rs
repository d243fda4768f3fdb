//! UCI protocol front-end and command loop.
//!
//! Parses UCI commands, maintains the current position, routes `go` requests
//! to the selected engine and emits protocol output. Besides the standard
//! commands it understands `undo` (take back one ply) and `d` (print the
//! board, the legal moves and the game status).

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::engines::engine_negamax::{NegamaxEngine, MAX_ENGINE_DEPTH};
use crate::engines::engine_random::RandomEngine;
use crate::engines::engine_trait::{Engine, GoParams};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{apply_move, undo_last};
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::search::negamax::DEFAULT_SEARCH_DEPTH;
use crate::utils::long_algebraic::{long_algebraic_to_move, move_to_long_algebraic};
use crate::utils::render_game_state::render_game_state;

const UCI_ENGINE_NAME: &str = "Mailbox Chess";
const UCI_ENGINE_AUTHOR: &str = "mailbox_chess developers";

pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_loop(stdin.lock(), &mut stdout)
}

/// Drives the protocol over any line source; returns after `quit` or end of
/// input.
pub fn run_loop(input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    let mut uci = UciState::new();

    for line in input.lines() {
        let line = line?;
        let should_quit = uci.handle_command(&line, out)?;
        out.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

struct UciState {
    game_state: GameState,
    engine: Box<dyn Engine>,
    skill_level: u8,
    seed: Option<String>,
    shuffle: bool,
}

impl UciState {
    fn new() -> Self {
        let skill_level = DEFAULT_SEARCH_DEPTH;
        Self {
            game_state: GameState::new_game(),
            engine: build_engine(skill_level),
            skill_level,
            seed: None,
            shuffle: true,
        }
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        let mut parts = trimmed.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Ok(false);
        };

        match cmd {
            "uci" => {
                writeln!(out, "id name {UCI_ENGINE_NAME}")?;
                writeln!(out, "id author {UCI_ENGINE_AUTHOR}")?;
                writeln!(
                    out,
                    "option name Skill Level type spin default {DEFAULT_SEARCH_DEPTH} min 0 max {MAX_ENGINE_DEPTH}"
                )?;
                writeln!(out, "option name Seed type string default <random>")?;
                writeln!(out, "option name Shuffle type check default true")?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                writeln!(out, "readyok")?;
            }
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    writeln!(out, "info string setoption error: {err}")?;
                }
            }
            "ucinewgame" => {
                self.game_state = GameState::new_game();
                self.engine.new_game();
            }
            "position" => {
                if let Err(err) = self.handle_position(trimmed) {
                    writeln!(out, "info string position error: {err}")?;
                }
            }
            "go" => {
                if let Err(err) = self.handle_go(trimmed, out) {
                    writeln!(out, "info string go error: {err}")?;
                    writeln!(out, "bestmove 0000")?;
                }
            }
            "undo" => {
                undo_last(&mut self.game_state);
            }
            "d" => {
                self.write_diagnostics(out)?;
            }
            "stop" => {
                // Search is synchronous; nothing is running by the time this arrives.
            }
            "quit" => {
                return Ok(true);
            }
            _ => {
                // Unknown commands are ignored for UCI compatibility.
            }
        }

        Ok(false)
    }

    fn handle_setoption(&mut self, line: &str) -> Result<(), String> {
        let mut tokens = line.split_whitespace();
        let _ = tokens.next(); // setoption

        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in tokens {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        let name = name_tokens.join(" ");
        let value = value_tokens.join(" ");

        if name.eq_ignore_ascii_case("Skill Level") {
            let parsed = value
                .parse::<u8>()
                .map_err(|_| format!("invalid Skill Level value '{value}'"))?;
            if parsed > MAX_ENGINE_DEPTH {
                return Err(format!("Skill Level must be at most {MAX_ENGINE_DEPTH}"));
            }
            self.skill_level = parsed;
            self.engine = build_engine(parsed);
            self.engine
                .set_option("Shuffle", if self.shuffle { "true" } else { "false" })?;
            if let Some(seed) = &self.seed {
                self.engine.set_option("Seed", seed)?;
            }
            self.engine.new_game();
        } else if name.eq_ignore_ascii_case("Seed") {
            self.engine.set_option("Seed", &value)?;
            self.seed = Some(value);
        } else if name.eq_ignore_ascii_case("Shuffle") {
            self.engine.set_option("Shuffle", &value)?;
            self.shuffle = value.eq_ignore_ascii_case("true");
        } else {
            self.engine.set_option(&name, &value)?;
        }

        Ok(())
    }

    fn handle_position(&mut self, line: &str) -> Result<(), String> {
        let mut tokens = line.split_whitespace().peekable();
        let _ = tokens.next(); // "position"

        let mut base_state = match tokens.next() {
            Some("startpos") => GameState::new_game(),
            Some("fen") => {
                let mut fen_parts = Vec::<&str>::new();
                while let Some(next) = tokens.next_if(|tok| *tok != "moves") {
                    fen_parts.push(next);
                }
                if fen_parts.is_empty() {
                    return Err("missing FEN after 'position fen'".to_owned());
                }
                GameState::from_fen(&fen_parts.join(" "))?
            }
            Some(other) => return Err(format!("unsupported position token '{other}'")),
            None => return Err("incomplete position command".to_owned()),
        };

        if tokens.next_if_eq(&"moves").is_some() {
            for lan in tokens {
                let mv = long_algebraic_to_move(lan, &mut base_state).inspect_err(|err| {
                    debug!(lan, %err, "rejected move in position command");
                })?;
                apply_move(&mut base_state, mv).map_err(|err| err.to_string())?;
            }
        }

        self.game_state = base_state;
        Ok(())
    }

    fn handle_go(&mut self, line: &str, out: &mut impl Write) -> Result<(), String> {
        let params = parse_go_params(line);
        let result = self.engine.choose_move(&mut self.game_state, &params)?;

        for info in &result.info_lines {
            writeln!(out, "{info}").map_err(|e| e.to_string())?;
        }

        let lan = result
            .best_move
            .map(|mv| move_to_long_algebraic(&mv))
            .unwrap_or_else(|| "0000".to_owned());
        writeln!(out, "bestmove {lan}").map_err(|e| e.to_string())
    }

    fn write_diagnostics(&mut self, out: &mut impl Write) -> io::Result<()> {
        let moves = legal_moves(&mut self.game_state);

        writeln!(out, "{}", render_game_state(&self.game_state))?;
        writeln!(out, "side to move: {:?}", self.game_state.side_to_move)?;

        let listed = moves.iter().map(|mv| mv.to_string()).collect::<Vec<_>>();
        writeln!(out, "legal moves ({}): {}", moves.len(), listed.join(" "))?;

        let status = if self.game_state.checkmate {
            "checkmate"
        } else if self.game_state.stalemate {
            "stalemate"
        } else if is_in_check(&self.game_state) {
            "check"
        } else {
            "in progress"
        };
        writeln!(out, "status: {status}")
    }
}

fn parse_go_params(line: &str) -> GoParams {
    let mut params = GoParams::default();
    let mut tokens = line.split_whitespace();
    while let Some(tok) = tokens.next() {
        match tok {
            "depth" => {
                params.depth = tokens
                    .next()
                    .and_then(|x| x.parse::<u8>().ok())
                    .map(|depth| depth.min(MAX_ENGINE_DEPTH));
            }
            "movetime" => {
                params.movetime_ms = tokens.next().and_then(|x| x.parse::<u64>().ok());
            }
            _ => {}
        }
    }
    params
}

/// Skill 0 plays random legal moves; any other level searches that many
/// plies.
fn build_engine(skill_level: u8) -> Box<dyn Engine> {
    match skill_level {
        0 => Box::new(RandomEngine::new()),
        depth => Box::new(NegamaxEngine::new(depth)),
    }
}
