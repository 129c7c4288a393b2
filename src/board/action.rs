//! Player actions.
//!
//! A `Move` is one of the three things a player can do on their turn. Moves
//! carry only node ids; they are always interpreted against the state that
//! generated them.

use serde::{Deserialize, Serialize};

use super::topology::{Board, NodeId};

/// A single player action.
///
/// Wire form is internally tagged on `action`:
/// `{"action":"place","node":3}`, `{"action":"move","node":3,"target":4}`,
/// `{"action":"remove","node":7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Move {
    /// Put a piece from hand on an empty node.
    Place { node: NodeId },

    /// Slide one of the mover's pieces to an adjacent empty node.
    #[serde(rename = "move")]
    Slide { node: NodeId, target: NodeId },

    /// Take an opponent's unprotected piece off the board.
    Remove { node: NodeId },
}

impl Move {
    /// The action keyword used on the wire.
    pub const fn action(&self) -> &'static str {
        match self {
            Move::Place { .. } => "place",
            Move::Slide { .. } => "move",
            Move::Remove { .. } => "remove",
        }
    }

    /// The node where a piece ends up, if the action puts one down.
    pub const fn landing(&self) -> Option<NodeId> {
        match *self {
            Move::Place { node } => Some(node),
            Move::Slide { target, .. } => Some(target),
            Move::Remove { .. } => None,
        }
    }

    /// Human-readable form using board node names: `place a`, `move a-j`, `remove c`.
    pub fn describe(&self, board: &Board) -> String {
        match *self {
            Move::Place { node } => format!("place {}", board.name(node)),
            Move::Slide { node, target } => {
                format!("move {}-{}", board.name(node), board.name(target))
            }
            Move::Remove { node } => format!("remove {}", board.name(node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_is_tagged_on_action() {
        let mv = Move::Slide { node: NodeId(3), target: NodeId(4) };
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(json, r#"{"action":"move","node":3,"target":4}"#);

        let place: Move = serde_json::from_str(r#"{"action":"place","node":9}"#).unwrap();
        assert_eq!(place, Move::Place { node: NodeId(9) });
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = serde_json::from_str::<Move>(r#"{"action":"fly","node":1}"#);
        assert!(err.is_err());
    }

    #[test]
    fn describe_uses_node_names() {
        let board = Board::nine_mens_morris();
        let a = board.node_id("a").unwrap();
        let j = board.node_id("j").unwrap();
        assert_eq!(Move::Place { node: a }.describe(&board), "place a");
        assert_eq!(Move::Slide { node: a, target: j }.describe(&board), "move a-j");
        assert_eq!(Move::Remove { node: j }.describe(&board), "remove j");
    }

    #[test]
    fn landing_node() {
        assert_eq!(Move::Place { node: NodeId(1) }.landing(), Some(NodeId(1)));
        assert_eq!(
            Move::Slide { node: NodeId(1), target: NodeId(2) }.landing(),
            Some(NodeId(2))
        );
        assert_eq!(Move::Remove { node: NodeId(1) }.landing(), None);
        assert_eq!(Move::Remove { node: NodeId(1) }.action(), "remove");
    }
}
