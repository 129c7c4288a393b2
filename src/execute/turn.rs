//! Turn sequencing.
//!
//! Decides what happens after a piece lands (mill check, removal phase) and
//! hands the turn to the next player with the right phase.
//!
//! Phase flow for the player to act:
//! - Place   -> Remove (landed in a mill with something removable) OR next player
//! - Move    -> Remove (same condition) OR next player
//! - Remove  -> next player
//! - next player: Place while pieces remain in hand, else Move, or Lost if blocked

use crate::board::{GameState, NodeId, Phase};
use crate::movegen::valid_moves;

/// Runs after a placement or slide that put a piece on `landed`.
pub(crate) fn follow_up(state: &mut GameState, landed: NodeId) {
    state.recalculate();
    if state.check_mill(state.current_player, landed) {
        state.phase = Phase::RemovePiece;
        // A mill only grants a removal if there is something to take.
        if valid_moves(state).is_empty() {
            advance(state);
        }
    } else {
        advance(state);
    }
}

/// Passes the turn to the next player and sets their phase.
pub(crate) fn advance(state: &mut GameState) {
    state.current_player = (state.current_player + 1) % state.players.len();
    let current = state.current_player;

    if state.players[current].pieces == 0 {
        state.phase = Phase::MovePiece;
        if valid_moves(state).is_empty() {
            state.phase = Phase::Lost;
            state.players[current].score = 0;
        }
    } else {
        state.phase = Phase::PlacePiece;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Player};
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

    #[test]
    fn advance_wraps_to_first_player() {
        let mut state = position(1, Phase::PlacePiece, [3, 3], &["a"], &["x"]);
        advance(&mut state);
        assert_eq!(state.current_player, 0);
        assert_eq!(state.phase, Phase::PlacePiece);
    }

    #[test]
    fn advance_switches_to_moving_when_hand_is_empty() {
        let mut state = position(0, Phase::PlacePiece, [0, 0], &["a"], &["x"]);
        advance(&mut state);
        assert_eq!(state.current_player, 1);
        assert_eq!(state.phase, Phase::MovePiece);
    }

    #[test]
    fn advance_marks_blocked_player_lost() {
        let mut state = position(1, Phase::MovePiece, [0, 0], &["a"], &["b", "j"]);
        advance(&mut state);
        assert_eq!(state.current_player, 0);
        assert_eq!(state.phase, Phase::Lost);
        assert_eq!(state.players[0].score, 0);
        assert_eq!(state.players[1].score, 2);
    }

    #[test]
    fn follow_up_enters_removal_on_mill() {
        let mut state = position(0, Phase::PlacePiece, [6, 6], &["a", "b", "c"], &["x"]);
        let c = state.board.node_id("c").unwrap();
        follow_up(&mut state, c);
        assert_eq!(state.current_player, 0);
        assert_eq!(state.phase, Phase::RemovePiece);
    }

    #[test]
    fn follow_up_skips_removal_when_nothing_removable() {
        let mut state = position(0, Phase::PlacePiece, [6, 6], &["a", "b", "c"], &["d", "e", "f"]);
        let c = state.board.node_id("c").unwrap();
        follow_up(&mut state, c);
        assert_eq!(state.current_player, 1);
        assert_eq!(state.phase, Phase::PlacePiece);
    }

    #[test]
    fn follow_up_without_mill_passes_turn() {
        let mut state = position(0, Phase::PlacePiece, [6, 6], &["a", "b", "e"], &["x"]);
        let e = state.board.node_id("e").unwrap();
        follow_up(&mut state, e);
        assert_eq!(state.current_player, 1);
    }
}
