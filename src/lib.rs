//! millrace engine library.
//!
//! Exposes the board and state model, move generation and execution, the
//! time-boxed move search, and the JSON protocol for use by the binaries
//! and integration tests.

pub mod board;
pub mod engine;
pub mod execute;
pub mod morris;
pub mod movegen;
pub mod protocol;
pub mod search;
pub mod selfplay;
