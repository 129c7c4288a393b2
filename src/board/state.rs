//! Game state representation.
//!
//! A `GameState` is a snapshot of one position: who is to act, in which
//! phase, and which nodes each player holds. States are treated as immutable
//! once built; the executor clones and edits a copy. The board is shared
//! through an `Arc`, so cloning a state copies only the per-player data.
//!
//! Derived data (node owners, active mills, scores) is recomputed from the
//! occupied-node lists by [`GameState::recalculate`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::topology::{Board, Mill, NodeId};
use super::variant::{Variant, PLAYER_COUNT};

/// What the current player is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PlacePiece,
    MovePiece,
    RemovePiece,
    /// The current player is blocked. Terminal.
    Lost,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Phase::PlacePiece => "place_piece",
            Phase::MovePiece => "move_piece",
            Phase::RemovePiece => "remove_piece",
            Phase::Lost => "lost",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One player's holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Pieces still in hand.
    pub pieces: u8,
    /// Occupied nodes, in the order they were taken.
    pub places: Vec<NodeId>,
    /// Derived; ignored on input.
    #[serde(default)]
    pub score: i32,
}

impl Player {
    /// A player with `pieces` in hand and nothing on the board.
    pub fn new(pieces: u8) -> Self {
        Player { pieces, places: Vec::new(), score: 0 }
    }
}

/// Errors for states decoded from external data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("state has no players")]
    NoPlayers,

    #[error("{0} players is more than a state can hold")]
    TooManyPlayers(usize),

    #[error("current player {current} is out of range for {players} players")]
    PlayerOutOfRange { current: usize, players: usize },

    #[error("player {player} occupies node {node}, which is not on the board")]
    NodeOutOfRange { player: usize, node: u8 },

    #[error("node '{0}' is occupied more than once")]
    NodeOccupiedTwice(String),
}

/// Most players a state can track; owners are stored as `u8`.
pub const MAX_PLAYERS: usize = u8::MAX as usize + 1;

/// Complete game state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StateRecord")]
pub struct GameState {
    pub board: Arc<Board>,
    pub current_player: usize,
    pub phase: Phase,
    pub players: Vec<Player>,
    /// Active mills as indices into `board.mills()`. Derived.
    pub mills: Vec<usize>,
    /// Owner of each node, indexed by `NodeId`. Derived.
    #[serde(skip)]
    owners: Vec<Option<u8>>,
}

/// Wire form of a state: everything except the derived fields.
#[derive(Deserialize)]
struct StateRecord {
    board: Arc<Board>,
    current_player: usize,
    phase: Phase,
    players: Vec<Player>,
}

impl TryFrom<StateRecord> for GameState {
    type Error = StateError;

    fn try_from(record: StateRecord) -> Result<Self, Self::Error> {
        GameState::from_parts(record.board, record.current_player, record.phase, record.players)
    }
}

impl GameState {
    /// Creates the opening position: every player has `pieces` in hand and
    /// player 0 is to place. `player_count` is capped at `MAX_PLAYERS`.
    pub fn new(board: Arc<Board>, player_count: usize, pieces: u8) -> Self {
        let mut state = GameState {
            board,
            current_player: 0,
            phase: Phase::PlacePiece,
            players: (0..player_count.min(MAX_PLAYERS)).map(|_| Player::new(pieces)).collect(),
            mills: Vec::new(),
            owners: Vec::new(),
        };
        state.recalculate();
        state
    }

    /// Opening position for a built-in variant.
    pub fn from_variant(variant: Variant) -> Self {
        GameState::new(Arc::new(variant.board()), PLAYER_COUNT, variant.pieces())
    }

    /// Assembles a state from raw parts, checking structural consistency.
    /// Scores in `players` are ignored and recomputed.
    pub fn from_parts(
        board: Arc<Board>,
        current_player: usize,
        phase: Phase,
        players: Vec<Player>,
    ) -> Result<Self, StateError> {
        if players.is_empty() {
            return Err(StateError::NoPlayers);
        }
        if players.len() > MAX_PLAYERS {
            return Err(StateError::TooManyPlayers(players.len()));
        }
        if current_player >= players.len() {
            return Err(StateError::PlayerOutOfRange {
                current: current_player,
                players: players.len(),
            });
        }

        let mut seen = vec![false; board.node_count()];
        for (p, player) in players.iter().enumerate() {
            for &node in &player.places {
                let Some(slot) = seen.get_mut(node.index()) else {
                    return Err(StateError::NodeOutOfRange { player: p, node: node.0 });
                };
                if *slot {
                    return Err(StateError::NodeOccupiedTwice(board.name(node).to_string()));
                }
                *slot = true;
            }
        }

        let mut state = GameState {
            board,
            current_player,
            phase,
            players,
            mills: Vec::new(),
            owners: Vec::new(),
        };
        state.recalculate();
        Ok(state)
    }

    /// Recomputes the owner map, active mills, and scores from the players'
    /// occupied nodes. A player's score is the number of nodes held, except
    /// the current player scores 0 once `Lost`.
    pub fn recalculate(&mut self) {
        self.owners.clear();
        self.owners.resize(self.board.node_count(), None);

        for (p, player) in self.players.iter_mut().enumerate() {
            for node in &player.places {
                self.owners[node.index()] = Some(p as u8);
            }
            player.score = player.places.len() as i32;
            if p == self.current_player && self.phase == Phase::Lost {
                player.score = 0;
            }
        }

        self.mills.clear();
        for (i, mill) in self.board.mills().iter().enumerate() {
            let first = self.owners[mill[0].index()];
            if first.is_some() && mill.iter().all(|n| self.owners[n.index()] == first) {
                self.mills.push(i);
            }
        }
    }

    /// Player holding `node`, if any.
    #[inline]
    pub fn owner(&self, node: NodeId) -> Option<usize> {
        self.owners.get(node.index()).copied().flatten().map(usize::from)
    }

    /// True if any player holds `node`.
    #[inline]
    pub fn is_occupied(&self, node: NodeId) -> bool {
        self.owner(node).is_some()
    }

    /// True if `player` holds `node` and the node is part of an active mill.
    pub fn check_mill(&self, player: usize, node: NodeId) -> bool {
        self.owner(node) == Some(player)
            && self.active_mills().any(|mill| mill.contains(&node))
    }

    /// Iterates the active mills of every player.
    pub fn active_mills(&self) -> impl Iterator<Item = &Mill> + '_ {
        self.mills.iter().map(|&i| &self.board.mills()[i])
    }

    /// The player to act.
    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    /// True once the player to act has lost.
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Lost
    }

    /// In a two-player game, the opponent of a player who has lost.
    pub fn winner(&self) -> Option<usize> {
        if self.is_over() && self.players.len() == 2 {
            Some(1 - self.current_player)
        } else {
            None
        }
    }
}
