//! Self-play game generation.
//!
//! Plays complete games with the engine's search choosing moves, either
//! against itself or against a uniformly random mover. Each finished game
//! becomes a `GameRecord`, which can be written out as JSONL.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::board::{GameState, Move, Variant};
use crate::execute::{execute_move, InvalidMove};
use crate::morris;
use crate::movegen::valid_moves;
use crate::search::SearchOptions;

/// Who the engine plays against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Opponent {
    /// The search plays both sides.
    #[default]
    Engine,
    /// One side picks uniformly among its legal moves.
    Random,
}

impl Opponent {
    /// Parses an opponent from its command-line name.
    pub fn from_name(s: &str) -> Option<Opponent> {
        match s {
            "engine" => Some(Opponent::Engine),
            "random" => Some(Opponent::Random),
            _ => None,
        }
    }
}

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Time budget per engine move (milliseconds).
    pub movetime_ms: u64,
    /// Plies after which an unfinished game is scored as a draw.
    pub max_plies: usize,
    pub variant: Variant,
    pub opponent: Opponent,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            movetime_ms: 200,
            max_plies: 200,
            variant: Variant::NineMensMorris,
            opponent: Opponent::Engine,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// A complete self-play game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub variant: Variant,
    pub opponent: Opponent,
    /// The player the search controls when playing a random opponent.
    pub engine_player: Option<usize>,
    /// The winning player, or `None` if the ply limit was reached.
    pub winner: Option<usize>,
    pub plies: usize,
    /// Pieces on the board for each player at the end.
    pub final_scores: Vec<i32>,
    /// Every move played, in order, as `place a` / `move a-j` / `remove c`.
    pub moves: Vec<String>,
}

impl GameRecord {
    /// Whether the game ended with the search's side winning against a random mover.
    pub fn engine_won(&self) -> bool {
        self.engine_player.is_some() && self.engine_player == self.winner
    }
}

/// Picks the move for the player to act.
fn choose_move(
    config: &SelfPlayConfig,
    state: &GameState,
    engine_player: Option<usize>,
    rng: &mut SmallRng,
) -> Result<Option<Move>, InvalidMove> {
    let random_turn = matches!(engine_player, Some(p) if p != state.current_player);
    let candidates = if random_turn {
        valid_moves(state)
    } else {
        let options = SearchOptions::from_millis(config.movetime_ms);
        morris::next_move(state, &options, &mut std::io::sink())?.moves
    };
    // Ties among the best moves are broken at random.
    Ok(candidates.choose(rng).cloned())
}

/// Plays a single self-play game and returns the game record.
pub fn play_game(
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, InvalidMove> {
    let mut state = GameState::from_variant(config.variant);
    let engine_player = match config.opponent {
        Opponent::Engine => None,
        Opponent::Random => Some(game_id % state.players.len()),
    };
    let mut moves = Vec::new();

    while !state.is_over() && moves.len() < config.max_plies {
        let mv = match choose_move(config, &state, engine_player, rng)? {
            Some(mv) => mv,
            None => break,
        };
        moves.push(mv.describe(&state.board));
        state = execute_move(&state, &mv)?;
    }

    Ok(GameRecord {
        game_id,
        variant: config.variant,
        opponent: config.opponent,
        engine_player,
        winner: state.winner(),
        plies: moves.len(),
        final_scores: state.players.iter().map(|p| p.score).collect(),
        moves,
    })
}

fn outcome(game: &GameRecord) -> String {
    match game.winner {
        Some(w) => format!("player {} wins", w),
        None => "draw".to_string(),
    }
}

fn seeded_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Runs self-play generation, producing multiple game records.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    });
    games
}

/// Runs self-play generation, calling `on_game` with each completed game record.
///
/// Games may complete out of order when running in parallel. A game that
/// fails is reported on stderr and skipped.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_self_play_parallel(config, on_game);
    } else {
        run_self_play_sequential(config, on_game);
    }
}

fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let mut rng = seeded_rng(config.seed, i);
        let game_start = Instant::now();
        match play_game(config, i, &mut rng) {
            Ok(game) => {
                if !config.quiet {
                    eprintln!(
                        "Game {}/{}: {} after {} plies ({:.1}s)",
                        i + 1,
                        config.num_games,
                        outcome(&game),
                        game.plies,
                        game_start.elapsed().as_secs_f64(),
                    );
                }
                on_game(game);
            }
            Err(e) => eprintln!("Game {}: aborted: {}", i + 1, e),
        }
    }
}

/// Plays games concurrently on a rayon pool and hands them back over a channel.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(config.threads).build() {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("thread pool unavailable ({}), playing sequentially", e);
            return run_self_play_sequential(config, on_game);
        }
    };

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();
    let worker_config = config.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..worker_config.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let mut rng = seeded_rng(worker_config.seed, i);
                    let game_start = Instant::now();
                    let game = match play_game(&worker_config, i, &mut rng) {
                        Ok(game) => game,
                        Err(e) => {
                            eprintln!("Game {}: aborted: {}", i + 1, e);
                            return;
                        }
                    };
                    if !worker_config.quiet {
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        eprintln!(
                            "Game {}/{}: {} after {} plies ({:.1}s)",
                            n,
                            worker_config.num_games,
                            outcome(&game),
                            game.plies,
                            game_start.elapsed().as_secs_f64(),
                        );
                    }
                    let _ = tx.send(game);
                });
        });
    });

    for game in rx {
        on_game(game);
    }

    if handle.join().is_err() {
        eprintln!("selfplay worker thread panicked");
    }
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        write_game_json(game, out)?;
    }
    out.flush()
}

/// Writes a single game record as one JSON line.
pub fn write_game_json<W: Write>(game: &GameRecord, out: &mut W) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, game)?;
    writeln!(out)
}

/// Prints a summary of self-play results to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let total = games.len();
    let mut wins = [0usize; 2];
    let mut draws = 0usize;
    let mut engine_wins = 0usize;
    let mut against_random = 0usize;
    let mut total_plies = 0usize;

    for game in games {
        total_plies += game.plies;
        match game.winner {
            Some(w) if w < wins.len() => wins[w] += 1,
            Some(_) => {}
            None => draws += 1,
        }
        if game.engine_player.is_some() {
            against_random += 1;
            if game.engine_won() {
                engine_wins += 1;
            }
        }
    }

    let pct = |n: usize| 100.0 * n as f64 / total.max(1) as f64;
    eprintln!("=== Self-Play Summary ===");
    eprintln!("Games: {}", total);
    eprintln!("Avg plies/game: {:.1}", total_plies as f64 / total.max(1) as f64);
    for (player, &n) in wins.iter().enumerate() {
        eprintln!("Player {} wins: {} ({:.1}%)", player, n, pct(n));
    }
    eprintln!("Draws (ply limit): {} ({:.1}%)", draws, pct(draws));
    if against_random > 0 {
        eprintln!("Engine wins vs random: {}/{}", engine_wins, against_random);
    }
}
