//! Search and planning.
//!
//! A game-agnostic, time-boxed Monte Carlo sampler that ranks the moves
//! available at the root by the average score margin of the positions
//! reachable below them.

pub mod game;
pub mod sampler;

pub use game::{Game, Scored};
pub use sampler::{
    next_move, MoveStats, SearchOptions, SearchResult, StopReason, DEFAULT_MAX_FRONTIER,
    DEFAULT_MAX_STATES,
};
