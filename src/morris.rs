//! Morris as a searchable game.
//!
//! Binds the move generator and executor to the search's `Game` trait and
//! exposes per-player scores through `Scored`.

use std::io::Write;

use crate::board::{GameState, Move};
use crate::execute::{execute_move, InvalidMove};
use crate::movegen::valid_moves;
use crate::search::{self, Game, Scored, SearchOptions, SearchResult};

/// The Morris family of games. All rules data lives in the state's board.
#[derive(Debug, Clone, Copy, Default)]
pub struct Morris;

impl Game for Morris {
    type State = GameState;
    type Move = Move;
    type Error = InvalidMove;

    fn valid_moves(&self, state: &GameState) -> Vec<Move> {
        valid_moves(state)
    }

    fn execute_move(&self, state: &GameState, mv: &Move) -> Result<GameState, InvalidMove> {
        execute_move(state, mv)
    }
}

impl Scored for GameState {
    fn current_player(&self) -> usize {
        self.current_player
    }

    fn player_count(&self) -> usize {
        self.players.len()
    }

    fn score(&self, player: usize) -> i64 {
        self.players[player].score as i64
    }
}

/// Searches `state` within `options` and returns the best moves for the player to act.
pub fn next_move<W: Write>(
    state: &GameState,
    options: &SearchOptions,
    out: &mut W,
) -> Result<SearchResult<Move>, InvalidMove> {
    search::next_move(&Morris, state, options, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, NodeId, Phase, Player, Variant};
    use crate::search::StopReason;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

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
    fn margin_counts_pieces() {
        let state = position(0, Phase::MovePiece, [0, 0], &["a", "b", "c", "e"], &["j", "k"]);
        assert_eq!(state.margin(0), 2);
        assert_eq!(state.margin(1), -2);
    }

    #[test]
    fn margin_of_lost_player() {
        let state = position(1, Phase::Lost, [0, 0], &["a", "b"], &["c", "d", "e"]);
        assert_eq!(state.margin(0), 2);
        assert_eq!(state.margin(1), -2);
    }

    #[test]
    fn zero_time_returns_all_openings() {
        let state = GameState::from_variant(Variant::NineMensMorris);
        let mut out = Vec::new();
        let result = next_move(&state, &SearchOptions::from_millis(0), &mut out).unwrap();
        assert_eq!(result.moves.len(), 24);
        assert_eq!(result.score, None);
    }

    #[test]
    fn only_legal_move_is_chosen() {
        // Player 0's single piece at 'a' can only slide to 'j'.
        let state = position(0, Phase::MovePiece, [0, 0], &["a"], &["b", "w", "x"]);
        let mut out = Vec::new();
        let result = next_move(&state, &SearchOptions::from_millis(50), &mut out).unwrap();
        let a = state.board.node_id("a").unwrap();
        let j = state.board.node_id("j").unwrap();
        assert_eq!(result.moves, vec![Move::Slide { node: a, target: j }]);
        assert!(result.score.is_some());
    }

    #[test]
    fn takes_the_only_unprotected_piece() {
        let state = position(0, Phase::RemovePiece, [3, 3], &["a", "b", "c"], &["d", "e", "f", "x"]);
        let mut out = Vec::new();
        let result = next_move(&state, &SearchOptions::from_millis(50), &mut out).unwrap();
        let x = state.board.node_id("x").unwrap();
        assert_eq!(result.moves, vec![Move::Remove { node: x }]);
    }

    #[test]
    fn search_leaves_input_untouched() {
        let state = position(0, Phase::PlacePiece, [7, 7], &["a", "b"], &["x", "w"]);
        let snapshot = state.clone();
        let mut out = Vec::new();
        let result = next_move(&state, &SearchOptions::from_millis(50), &mut out).unwrap();
        assert_eq!(state, snapshot);
        assert!(!result.moves.is_empty());
    }

    #[test]
    fn closing_a_mill_scores_best() {
        // Placing at 'c' completes a-b-c and immediately lets player 0
        // remove a piece, so its average margin should beat every other
        // placement after the first ply.
        let state = position(0, Phase::PlacePiece, [7, 7], &["a", "b"], &["x", "w"]);
        let c = state.board.node_id("c").unwrap();
        let mut out = Vec::new();
        let result = next_move(&state, &SearchOptions::from_millis(100), &mut out).unwrap();
        assert!(result.depth >= 1);
        assert!(result.moves.contains(&Move::Place { node: c }), "{:?}", result.moves);
    }

    #[test]
    fn long_opening_search_ends_near_its_budget() {
        let state = GameState::from_variant(Variant::NineMensMorris);
        let mut out = Vec::new();
        let begin = Instant::now();
        let result = next_move(&state, &SearchOptions::from_millis(2_000), &mut out).unwrap();
        let elapsed = begin.elapsed();
        assert!(elapsed < Duration::from_millis(2_750), "search took {:?}", elapsed);
        assert!(result.depth >= 2);
        assert_eq!(result.candidates.len(), 24);
    }

    #[test]
    fn generous_budget_stops_at_width_limit() {
        // Ply 5 of the six-men's opening holds 16*15*14*13*12 open moves,
        // more states than one ply may create.
        let state = GameState::from_variant(Variant::SixMensMorris);
        let mut out = Vec::new();
        let begin = Instant::now();
        let result = next_move(&state, &SearchOptions::from_millis(60_000), &mut out).unwrap();
        assert_eq!(result.stop, StopReason::Limit);
        assert_eq!(result.depth, 4);
        assert_eq!(result.nodes, 16 + 16 * 15 + 16 * 15 * 14 + 16 * 15 * 14 * 13);
        assert!(begin.elapsed() < Duration::from_secs(30));
    }
}
