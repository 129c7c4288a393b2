//! Self-play game generation CLI.
//!
//! Plays Morris games with the engine and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N        Number of games to play (default: 10)
//!   --movetime MS    Search time per move in ms (default: 200)
//!   --max-plies N    Ply limit before a game is drawn (default: 200)
//!   --variant NAME   nine_mens_morris or six_mens_morris (default: nine)
//!   --opponent NAME  engine or random (default: engine)
//!   --threads N      Number of parallel threads (default: 4)
//!   --seed N         Random seed, 0 for entropy (default: 0)
//!   --output FILE    Output file path (default: stdout)
//!   --quiet          Suppress progress and summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use millrace::board::Variant;
use millrace::selfplay::{self, GameRecord, Opponent, SelfPlayConfig};

/// Returns the value following a flag, exiting with usage on a bad or missing value.
fn flag_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|s| s.parse()) {
        Some(Ok(v)) => v,
        _ => fail(&format!("invalid {} value", flag)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    print_usage();
    process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.num_games = flag_value(&args, i, "--games");
            }
            "--movetime" => {
                i += 1;
                config.movetime_ms = flag_value(&args, i, "--movetime");
            }
            "--max-plies" => {
                i += 1;
                config.max_plies = flag_value(&args, i, "--max-plies");
            }
            "--variant" => {
                i += 1;
                let name: String = flag_value(&args, i, "--variant");
                config.variant = Variant::from_name(&name)
                    .unwrap_or_else(|| fail(&format!("unknown variant: {}", name)));
            }
            "--opponent" => {
                i += 1;
                let name: String = flag_value(&args, i, "--opponent");
                config.opponent = Opponent::from_name(&name)
                    .unwrap_or_else(|| fail(&format!("unknown opponent: {}", name)));
            }
            "--threads" => {
                i += 1;
                config.threads = flag_value(&args, i, "--threads");
            }
            "--seed" => {
                i += 1;
                config.seed = flag_value(&args, i, "--seed");
            }
            "--output" => {
                i += 1;
                output_path = Some(flag_value(&args, i, "--output"));
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => fail(&format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    if !config.quiet {
        eprintln!(
            "Self-play: {} games of {}, {}ms/move, max {} plies, vs {:?}, {} threads",
            config.num_games,
            config.variant.name(),
            config.movetime_ms,
            config.max_plies,
            config.opponent,
            config.threads
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config);
    let elapsed = start.elapsed();

    if !config.quiet {
        eprintln!(
            "Completed {} games in {:.1}s ({:.1} games/hour)",
            games.len(),
            elapsed.as_secs_f64(),
            games.len() as f64 / elapsed.as_secs_f64().max(1e-9) * 3600.0
        );
        selfplay::print_summary(&games);
    }

    let written = match &output_path {
        Some(path) => File::create(path).and_then(|file| write_games(&games, BufWriter::new(file))),
        None => write_games(&games, BufWriter::new(io::stdout().lock())),
    };
    match written {
        Ok(()) => {
            if let (Some(path), false) = (&output_path, config.quiet) {
                eprintln!("Wrote {} games to {}", games.len(), path);
            }
        }
        Err(e) => {
            eprintln!("failed to write output: {}", e);
            process::exit(1);
        }
    }
}

fn write_games<W: Write>(games: &[GameRecord], mut writer: W) -> io::Result<()> {
    selfplay::write_jsonl(games, &mut writer)
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --movetime MS    Search time per move in ms (default: 200)");
    eprintln!("  --max-plies N    Ply limit before a game is drawn (default: 200)");
    eprintln!("  --variant NAME   nine_mens_morris or six_mens_morris (default: nine)");
    eprintln!("  --opponent NAME  engine or random (default: engine)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}
