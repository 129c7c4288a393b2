//! Legal move generation.
//!
//! Enumerates the legal actions for the current player, branching on the
//! state's phase. An empty result means the player cannot act, which the
//! executor and the search both rely on to detect blocked players.

use crate::board::{GameState, Move, Phase};

/// Returns every legal action for the current player, in board order.
pub fn valid_moves(state: &GameState) -> Vec<Move> {
    match state.phase {
        Phase::PlacePiece => placements(state),
        Phase::MovePiece => slides(state),
        Phase::RemovePiece => removals(state),
        Phase::Lost => Vec::new(),
    }
}

/// One placement per empty node, if the mover has a piece in hand.
fn placements(state: &GameState) -> Vec<Move> {
    if state.current().pieces == 0 {
        return Vec::new();
    }
    state
        .board
        .node_ids()
        .filter(|&node| !state.is_occupied(node))
        .map(|node| Move::Place { node })
        .collect()
}

/// For each of the mover's pieces, one slide per adjacent empty node.
fn slides(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();
    for &node in &state.current().places {
        for target in state.board.neighbors(node) {
            if !state.is_occupied(target) {
                moves.push(Move::Slide { node, target });
            }
        }
    }
    moves
}

/// Every opponent piece that is not part of one of that opponent's mills.
///
/// Protected pieces are never removable, even when an opponent has nothing
/// but protected pieces left.
fn removals(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();
    for (p, player) in state.players.iter().enumerate() {
        if p == state.current_player {
            continue;
        }
        for &node in &player.places {
            if !state.check_mill(p, node) {
                moves.push(Move::Remove { node });
            }
        }
    }
    moves
}
