//! Board representation and game-state types.
//!
//! Contains the static board topology, the built-in variants, player
//! actions, and the game state snapshot.

pub mod action;
pub mod state;
pub mod topology;
pub mod variant;

pub use action::Move;
pub use state::{GameState, Phase, Player, StateError, MAX_PLAYERS};
pub use topology::{Board, BoardError, Edge, Mill, Node, NodeId};
pub use variant::{Variant, PLAYER_COUNT};
