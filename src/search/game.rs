//! Capabilities the search needs from a game.
//!
//! The search is written against these two traits only, so any turn-based
//! game whose states can report per-player scores can be plugged in.

/// A turn-based game: legal-move enumeration plus move execution.
pub trait Game {
    type State: Scored;
    type Move: Clone;
    type Error;

    /// Every legal move from `state`. Empty when the player to act is stuck
    /// or the game is over.
    fn valid_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Applies `mv` to `state`, returning a new state and leaving `state`
    /// untouched.
    fn execute_move(&self, state: &Self::State, mv: &Self::Move) -> Result<Self::State, Self::Error>;
}

/// Per-player scoring read by the search.
pub trait Scored {
    /// Index of the player to act.
    fn current_player(&self) -> usize;

    fn player_count(&self) -> usize;

    fn score(&self, player: usize) -> i64;

    /// `player`'s score minus the sum of every other player's score.
    fn margin(&self, player: usize) -> i64 {
        (0..self.player_count())
            .map(|p| if p == player { self.score(p) } else { -self.score(p) })
            .sum()
    }
}
