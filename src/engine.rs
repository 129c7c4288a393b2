//! Engine request handling.
//!
//! Dispatches protocol requests to the move generator, executor and search,
//! and writes one JSON response line per request. Search progress goes to a
//! separate info sink so it never mixes with responses.

use std::io::{self, Write};
use std::time::Duration;

use crate::board::GameState;
use crate::execute::execute_move;
use crate::morris;
use crate::movegen::valid_moves;
use crate::protocol::{parse_request, Payload, ProtocolError, Request, Response};
use crate::search::{SearchOptions, DEFAULT_MAX_FRONTIER, DEFAULT_MAX_STATES};

/// Default cap on a single search, in milliseconds.
pub const DEFAULT_MAX_MOVETIME_MS: u64 = 60_000;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound applied to the `time` of every search request.
    pub max_movetime_ms: u64,
    /// Most states a single search ply may create.
    pub max_states: usize,
    /// Most open moves a single search ply may leave behind.
    pub max_frontier: usize,
    /// Write `info` lines while searching.
    pub info: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_movetime_ms: DEFAULT_MAX_MOVETIME_MS,
            max_states: DEFAULT_MAX_STATES,
            max_frontier: DEFAULT_MAX_FRONTIER,
            info: true,
        }
    }
}

/// Answers protocol requests under a fixed configuration.
pub struct Engine {
    pub config: EngineConfig,
}

impl Engine {
    /// Creates an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Engine { config }
    }

    /// Search options for a request: the requested time, clamped to the
    /// configured maximum, plus the configured width limits.
    fn search_options(&self, requested_ms: u64) -> SearchOptions {
        SearchOptions {
            max_time: Duration::from_millis(requested_ms.min(self.config.max_movetime_ms)),
            max_states: self.config.max_states,
            max_frontier: self.config.max_frontier,
        }
    }

    /// Handles a decoded request.
    pub fn handle<L: Write>(&mut self, request: &Request, info: &mut L) -> Result<Payload, ProtocolError> {
        match request {
            Request::NextMove { state, time } => {
                let options = self.search_options(*time);
                let result = if self.config.info {
                    morris::next_move(state, &options, info)?
                } else {
                    morris::next_move(state, &options, &mut io::sink())?
                };
                if self.config.info {
                    let best: Vec<String> =
                        result.moves.iter().map(|m| m.describe(&state.board)).collect();
                    let _ = writeln!(
                        info,
                        "info string depth {} nodes {} time {} stop {} best {}",
                        result.depth,
                        result.nodes,
                        result.elapsed_ms,
                        result.stop,
                        best.join(", ")
                    );
                }
                Ok(Payload::Moves(result.moves))
            }
            Request::ValidMoves { state } => Ok(Payload::Moves(valid_moves(state))),
            Request::ExecuteMove { state, mv } => Ok(Payload::State(execute_move(state, mv)?)),
            Request::NewGame { variant } => Ok(Payload::State(GameState::from_variant(*variant))),
        }
    }

    /// Handles one raw input line and writes the response line to `out`.
    ///
    /// Blank lines are ignored. Bad requests produce an error response and a
    /// diagnostic on `info`; only I/O failures on `out` are returned.
    pub fn handle_line<W: Write, L: Write>(
        &mut self,
        line: &str,
        out: &mut W,
        info: &mut L,
    ) -> io::Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }

        let (context, request) = parse_request(line);
        let response = match request.and_then(|r| self.handle(&r, info)) {
            Ok(payload) => Response::ok(context, payload),
            Err(e) => {
                let _ = writeln!(info, "error: {}", e);
                Response::error(context, e.to_string())
            }
        };

        serde_json::to_writer(&mut *out, &response)?;
        writeln!(out)?;
        out.flush()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}
