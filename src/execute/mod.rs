//! Move execution.
//!
//! Applies one action to a state and returns the resulting state. The input
//! state is never modified: execution clones it, edits the copy, recomputes
//! derived data, and advances the turn.

mod turn;

use crate::board::{GameState, Move, NodeId, Phase};

/// Reasons an action cannot be applied to a state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMove {
    #[error("'{action}' is not allowed during the {phase} phase")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("node {0} is not on the board")]
    UnknownNode(u8),

    #[error("node '{0}' is already occupied")]
    Occupied(String),

    #[error("no pieces left in hand")]
    NoPiecesLeft,

    #[error("node '{0}' does not hold a piece of the player to move")]
    NotOwned(String),

    #[error("nodes '{from}' and '{to}' are not adjacent")]
    NotAdjacent { from: String, to: String },

    #[error("node '{0}' does not hold an opponent's piece")]
    NotOpponent(String),

    #[error("node '{0}' is protected by a mill")]
    Protected(String),
}

/// Applies `mv` for the current player and returns the new state.
pub fn execute_move(state: &GameState, mv: &Move) -> Result<GameState, InvalidMove> {
    check(state, mv)?;

    let mut next = state.clone();
    let current = next.current_player;
    match *mv {
        Move::Place { node } => {
            let player = &mut next.players[current];
            player.places.push(node);
            player.pieces -= 1;
        }
        Move::Slide { node, target } => {
            let player = &mut next.players[current];
            if let Some(slot) = player.places.iter_mut().find(|p| **p == node) {
                *slot = target;
            }
        }
        Move::Remove { node } => {
            if let Some(victim) = state.owner(node) {
                next.players[victim].places.retain(|p| *p != node);
            }
        }
    }

    // A piece that lands may close a mill; a removal always ends the turn.
    match mv.landing() {
        Some(landed) => turn::follow_up(&mut next, landed),
        None => {
            next.recalculate();
            turn::advance(&mut next);
        }
    }
    Ok(next)
}

/// Verifies that `mv` fits the state: right phase, nodes on the board, and
/// the occupancy rules for the action.
fn check(state: &GameState, mv: &Move) -> Result<(), InvalidMove> {
    let expected = match mv {
        Move::Place { .. } => Phase::PlacePiece,
        Move::Slide { .. } => Phase::MovePiece,
        Move::Remove { .. } => Phase::RemovePiece,
    };
    if state.phase != expected {
        return Err(InvalidMove::WrongPhase { action: mv.action(), phase: state.phase });
    }

    let board = &state.board;
    let on_board = |node: NodeId| {
        if board.contains(node) {
            Ok(())
        } else {
            Err(InvalidMove::UnknownNode(node.0))
        }
    };
    let name = |node: NodeId| board.name(node).to_string();

    match *mv {
        Move::Place { node } => {
            on_board(node)?;
            if state.is_occupied(node) {
                return Err(InvalidMove::Occupied(name(node)));
            }
            if state.current().pieces == 0 {
                return Err(InvalidMove::NoPiecesLeft);
            }
        }
        Move::Slide { node, target } => {
            on_board(node)?;
            on_board(target)?;
            if state.owner(node) != Some(state.current_player) {
                return Err(InvalidMove::NotOwned(name(node)));
            }
            if !board.is_adjacent(node, target) {
                return Err(InvalidMove::NotAdjacent { from: name(node), to: name(target) });
            }
            if state.is_occupied(target) {
                return Err(InvalidMove::Occupied(name(target)));
            }
        }
        Move::Remove { node } => {
            on_board(node)?;
            match state.owner(node) {
                Some(owner) if owner != state.current_player => {
                    if state.check_mill(owner, node) {
                        return Err(InvalidMove::Protected(name(node)));
                    }
                }
                _ => return Err(InvalidMove::NotOpponent(name(node))),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Player, Variant};
    use crate::movegen::valid_moves;
    use std::sync::Arc;

    fn position(current: usize, phase: Phase, hands: [u8; 2], p0: &[&str], p1: &[&str]) -> GameState {
        let board = Arc::new(Board::nine_mens_morris());
        let ids = |names: &[&str]| -> Vec<NodeId> {
            names.iter().map(|n| board.node_id(n).unwrap()).collect()
        };
        let players = vec![
            Player { pieces: hands[0], places: ids(p0), score: 0 },
            Player { pieces: hands[1], places: ids(p1), score: 0 },
        ];
        GameState::from_parts(board.clone(), current, phase, players).unwrap()
    }

    fn node(state: &GameState, name: &str) -> NodeId {
        state.board.node_id(name).unwrap()
    }

    #[test]
    fn place_adds_piece_and_passes_turn() {
        let state = GameState::from_variant(Variant::NineMensMorris);
        let e = node(&state, "e");
        let next = execute_move(&state, &Move::Place { node: e }).unwrap();
        assert_eq!(next.players[0].places, vec![e]);
        assert_eq!(next.players[0].pieces, 8);
        assert_eq!(next.players[0].score, 1);
        assert_eq!(next.current_player, 1);
        assert_eq!(next.phase, Phase::PlacePiece);
    }

    #[test]
    fn input_state_is_untouched() {
        let state = position(0, Phase::PlacePiece, [2, 2], &["a", "b"], &["x"]);
        let snapshot = state.clone();
        let c = node(&state, "c");
        let next = execute_move(&state, &Move::Place { node: c }).unwrap();
        assert_eq!(state, snapshot);
        assert_ne!(next, snapshot);
    }

    #[test]
    fn completing_a_mill_grants_removal() {
        let state = position(0, Phase::PlacePiece, [2, 2], &["a", "b"], &["x", "q"]);
        let c = node(&state, "c");
        let next = execute_move(&state, &Move::Place { node: c }).unwrap();
        assert_eq!(next.current_player, 0);
        assert_eq!(next.phase, Phase::RemovePiece);
        assert_eq!(next.mills.len(), 1);
        assert_eq!(valid_moves(&next).len(), 2);
    }

    #[test]
    fn removal_takes_opponent_piece_and_passes_turn() {
        let state = position(0, Phase::RemovePiece, [2, 2], &["a", "b", "c"], &["x", "q"]);
        let q = node(&state, "q");
        let next = execute_move(&state, &Move::Remove { node: q }).unwrap();
        assert_eq!(next.players[1].places, vec![node(&state, "x")]);
        assert_eq!(next.players[1].score, 1);
        assert_eq!(next.current_player, 1);
        assert_eq!(next.phase, Phase::PlacePiece);
    }

    #[test]
    fn slide_keeps_piece_order() {
        let state = position(0, Phase::MovePiece, [0, 0], &["a", "e", "x"], &["s"]);
        let e = node(&state, "e");
        let h = node(&state, "h");
        let next = execute_move(&state, &Move::Slide { node: e, target: h }).unwrap();
        assert_eq!(
            next.players[0].places,
            vec![node(&state, "a"), h, node(&state, "x")]
        );
        assert_eq!(next.current_player, 1);
        assert_eq!(next.phase, Phase::MovePiece);
    }

    #[test]
    fn slide_into_mill_grants_removal() {
        let state = position(0, Phase::MovePiece, [0, 0], &["a", "b", "o"], &["s", "t"]);
        let o = node(&state, "o");
        let c = node(&state, "c");
        let next = execute_move(&state, &Move::Slide { node: o, target: c }).unwrap();
        assert_eq!(next.phase, Phase::RemovePiece);
        assert_eq!(next.current_player, 0);
    }

    #[test]
    fn mill_is_checked_where_the_piece_lands() {
        // Player 0 already holds a-b-c; sliding e to d closes nothing new.
        let state = position(0, Phase::MovePiece, [0, 0], &["a", "b", "c", "e"], &["x"]);
        let e = node(&state, "e");
        let d = node(&state, "d");
        let next = execute_move(&state, &Move::Slide { node: e, target: d }).unwrap();
        assert_eq!(next.current_player, 1);
        assert_eq!(next.phase, Phase::MovePiece);
        assert_eq!(next.mills.len(), 1);
    }

    #[test]
    fn blocking_the_last_piece_wins() {
        // Player 0 at 'a' is hemmed in by 'b' once player 1 slides c -> b.
        let state = position(1, Phase::MovePiece, [0, 0], &["a"], &["c", "j"]);
        let next = execute_move(
            &state,
            &Move::Slide { node: node(&state, "c"), target: node(&state, "b") },
        )
        .unwrap();
        assert_eq!(next.current_player, 0);
        assert_eq!(next.phase, Phase::Lost);
        assert_eq!(next.players[0].score, 0);
        assert_eq!(next.winner(), Some(1));
        assert!(valid_moves(&next).is_empty());
    }

    #[test]
    fn last_placement_moves_into_moving_phase() {
        let state = position(1, Phase::PlacePiece, [0, 1], &["a", "v"], &["x"]);
        let next = execute_move(&state, &Move::Place { node: node(&state, "e") }).unwrap();
        assert_eq!(next.players[1].pieces, 0);
        assert_eq!(next.current_player, 0);
        assert_eq!(next.phase, Phase::MovePiece);
    }

    #[test]
    fn rejects_wrong_phase() {
        let state = GameState::from_variant(Variant::NineMensMorris);
        let err = execute_move(&state, &Move::Remove { node: NodeId(0) }).unwrap_err();
        assert_eq!(
            err,
            InvalidMove::WrongPhase { action: "remove", phase: Phase::PlacePiece }
        );
        assert_eq!(err.to_string(), "'remove' is not allowed during the place_piece phase");
    }

    #[test]
    fn rejects_bad_placements() {
        let state = position(0, Phase::PlacePiece, [1, 1], &["a"], &["b"]);
        assert_eq!(
            execute_move(&state, &Move::Place { node: NodeId(40) }),
            Err(InvalidMove::UnknownNode(40))
        );
        assert_eq!(
            execute_move(&state, &Move::Place { node: node(&state, "b") }),
            Err(InvalidMove::Occupied("b".into()))
        );

        let empty_hand = position(0, Phase::PlacePiece, [0, 1], &["a"], &["b"]);
        assert_eq!(
            execute_move(&empty_hand, &Move::Place { node: node(&state, "c") }),
            Err(InvalidMove::NoPiecesLeft)
        );
    }

    #[test]
    fn rejects_bad_slides() {
        let state = position(0, Phase::MovePiece, [0, 0], &["a", "e"], &["b"]);
        assert_eq!(
            execute_move(&state, &Move::Slide { node: node(&state, "b"), target: node(&state, "c") }),
            Err(InvalidMove::NotOwned("b".into()))
        );
        assert_eq!(
            execute_move(&state, &Move::Slide { node: node(&state, "a"), target: node(&state, "d") }),
            Err(InvalidMove::NotAdjacent { from: "a".into(), to: "d".into() })
        );
        assert_eq!(
            execute_move(&state, &Move::Slide { node: node(&state, "a"), target: node(&state, "b") }),
            Err(InvalidMove::Occupied("b".into()))
        );
    }

    #[test]
    fn rejects_bad_removals() {
        let state = position(0, Phase::RemovePiece, [0, 0], &["a", "b", "c"], &["d", "e", "f", "x"]);
        assert_eq!(
            execute_move(&state, &Move::Remove { node: node(&state, "a") }),
            Err(InvalidMove::NotOpponent("a".into()))
        );
        assert_eq!(
            execute_move(&state, &Move::Remove { node: node(&state, "q") }),
            Err(InvalidMove::NotOpponent("q".into()))
        );
        assert_eq!(
            execute_move(&state, &Move::Remove { node: node(&state, "e") }),
            Err(InvalidMove::Protected("e".into()))
        );
        assert!(execute_move(&state, &Move::Remove { node: node(&state, "x") }).is_ok());
    }
}
