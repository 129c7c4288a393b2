//! Anytime breadth-expanding move sampler.
//!
//! Expands the game tree one ply at a time under a wall-clock deadline. Every
//! state reached is scored for the player who was to move at the root and the
//! score is credited to the first-level move the state descends from. When
//! time runs out, the first-level moves with the best average are returned.
//!
//! A ply is committed only if it was fully expanded before the deadline; a
//! partially expanded ply is thrown away, so every committed ply covers the
//! whole frontier.
//!
//! Memory grows with the width of the tree, not with time, so two limits
//! bound a single ply: how many states it may create and how many open moves
//! it may leave for the next ply. Hitting either ends the search with the
//! last committed ply, the same as running out of time.

use std::fmt;
use std::io::Write;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::game::{Game, Scored};

/// Default cap on the states one ply may create.
pub const DEFAULT_MAX_STATES: usize = 500_000;

/// Default cap on the open moves one ply may leave behind.
pub const DEFAULT_MAX_FRONTIER: usize = 6_000_000;

/// Search constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Wall-clock budget for the whole search.
    pub max_time: Duration,
    /// A ply whose frontier is larger than this is not expanded.
    pub max_states: usize,
    /// A ply that would leave more open moves than this is discarded.
    pub max_frontier: usize,
}

impl SearchOptions {
    /// A time budget with the default width limits.
    pub fn new(max_time: Duration) -> Self {
        SearchOptions {
            max_time,
            max_states: DEFAULT_MAX_STATES,
            max_frontier: DEFAULT_MAX_FRONTIER,
        }
    }

    /// Shorthand for [`SearchOptions::new`] with a budget in milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        SearchOptions::new(Duration::from_millis(ms))
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The time budget ran out.
    Deadline,
    /// Every line reached a position with no moves.
    Exhausted,
    /// The next ply was wider than `max_states` or `max_frontier` allow.
    Limit,
}

impl StopReason {
    /// Short name used in info lines.
    pub const fn name(self) -> &'static str {
        match self {
            StopReason::Deadline => "deadline",
            StopReason::Exhausted => "exhausted",
            StopReason::Limit => "limit",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accumulated samples for one first-level move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveStats {
    pub score: i64,
    pub count: u64,
}

impl MoveStats {
    fn record(&mut self, margin: i64) {
        self.score += margin;
        self.count += 1;
    }

    /// Mean sampled margin, or `None` if the move was never sampled.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.score as f64 / self.count as f64)
        }
    }
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Best first-level moves, in generation order. Ties are all kept.
    pub moves: Vec<M>,
    /// Average margin of the best moves, `None` if nothing was sampled.
    pub score: Option<f64>,
    /// Every first-level move with its statistics, in generation order.
    pub candidates: Vec<(M, MoveStats)>,
    /// Number of committed plies.
    pub depth: u32,
    /// Number of states produced in committed plies.
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub stop: StopReason,
}

/// A move waiting to be expanded, tagged with the first-level move it
/// descends from and the state it applies to.
struct OpenMove<M, S> {
    mv: M,
    origin: u32,
    parent: Rc<S>,
}

/// Ranks the moves available in `state` by sampling the tree below them
/// until `options.max_time` has elapsed or a ply outgrows the width limits.
///
/// Emits one `info` line per committed ply to `out`. Errors from the game's
/// executor abort the search and are returned as-is.
pub fn next_move<G, W>(
    game: &G,
    state: &G::State,
    options: &SearchOptions,
    out: &mut W,
) -> Result<SearchResult<G::Move>, G::Error>
where
    G: Game,
    G::State: Clone,
    W: Write,
{
    let start = Instant::now();
    let deadline = start + options.max_time;
    let running = || Instant::now() < deadline;

    let player = state.current_player();
    let base_moves = game.valid_moves(state);
    let mut stats = vec![MoveStats::default(); base_moves.len()];

    let root = Rc::new(state.clone());
    let mut frontier: Vec<OpenMove<G::Move, G::State>> = base_moves
        .iter()
        .enumerate()
        .map(|(origin, mv)| OpenMove { mv: mv.clone(), origin: origin as u32, parent: Rc::clone(&root) })
        .collect();
    drop(root);

    let mut depth = 0u32;
    let mut nodes = 0u64;

    let stop = loop {
        if !running() {
            break StopReason::Deadline;
        }
        if frontier.is_empty() {
            break StopReason::Exhausted;
        }
        if frontier.len() > options.max_states {
            break StopReason::Limit;
        }

        // Heavy step. Parents are released as their moves are consumed; the
        // accumulators are untouched until the whole ply is in.
        let planned = frontier.len();
        let mut margins: Vec<(u32, i64)> = Vec::with_capacity(planned);
        let mut next = Vec::new();
        let mut cut = None;
        for OpenMove { mv, origin, parent } in std::mem::take(&mut frontier) {
            if !running() {
                cut = Some(StopReason::Deadline);
                break;
            }
            let child = game.execute_move(&parent, &mv)?;
            drop(parent);
            let moves = game.valid_moves(&child);
            if next.len() + moves.len() > options.max_frontier {
                cut = Some(StopReason::Limit);
                break;
            }
            margins.push((origin, child.margin(player)));
            let child = Rc::new(child);
            next.extend(moves.into_iter().map(|mv| OpenMove {
                mv,
                origin,
                parent: Rc::clone(&child),
            }));
        }
        if cut.is_none() && !running() {
            cut = Some(StopReason::Deadline);
        }
        if let Some(reason) = cut {
            break reason;
        }

        for (origin, margin) in margins {
            stats[origin as usize].record(margin);
        }
        nodes += planned as u64;
        frontier = next;
        depth += 1;

        let (_, best) = select_best(&stats);
        let _ = writeln!(
            out,
            "info depth {} nodes {} score {:.3} time {}",
            depth,
            nodes,
            best.unwrap_or(0.0),
            start.elapsed().as_millis()
        );
    };
    drop(frontier);

    let (best_indices, score) = select_best(&stats);
    Ok(SearchResult {
        moves: best_indices.iter().map(|&i| base_moves[i].clone()).collect(),
        score,
        candidates: base_moves.into_iter().zip(stats).collect(),
        depth,
        nodes,
        elapsed_ms: start.elapsed().as_millis() as u64,
        stop,
    })
}

/// Indices of the moves with the highest average, plus that average.
///
/// Unsampled moves have no rank and are skipped. If no move was sampled at
/// all, every move is returned with no score.
pub(crate) fn select_best(stats: &[MoveStats]) -> (Vec<usize>, Option<f64>) {
    let mut best = Vec::new();
    let mut best_score = f64::NEG_INFINITY;
    for (i, s) in stats.iter().enumerate() {
        let Some(avg) = s.average() else { continue };
        if avg > best_score {
            best_score = avg;
            best.clear();
        }
        if avg == best_score {
            best.push(i);
        }
    }

    if best.is_empty() {
        ((0..stats.len()).collect(), None)
    } else {
        (best, Some(best_score))
    }
}
