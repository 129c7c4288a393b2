//! millrace -- a Nine Men's Morris engine speaking line-delimited JSON.
//!
//! Reads one JSON request per stdin line and writes one JSON response per
//! stdout line. Search progress and diagnostics go to stderr.
//!
//! Options:
//!   --max-time MS      Cap on the `time` of any search request (default: 60000)
//!   --max-states N     Most states one search ply may create (default: 500000)
//!   --max-frontier N   Most open moves one search ply may leave (default: 6000000)
//!   --quiet            Do not write search info lines

use std::env;
use std::io::{self, BufRead};
use std::process;
use std::str::FromStr;

use millrace::engine::{Engine, EngineConfig};

/// Parses the value following a flag, exiting on a bad or missing value.
fn flag_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|s| s.parse()) {
        Some(Ok(v)) => v,
        _ => {
            eprintln!("invalid {} value", flag);
            process::exit(1);
        }
    }
}

fn parse_args() -> EngineConfig {
    let args: Vec<String> = env::args().collect();
    let mut config = EngineConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--max-time" => {
                i += 1;
                config.max_movetime_ms = flag_value(&args, i, "--max-time");
            }
            "--max-states" => {
                i += 1;
                config.max_states = flag_value(&args, i, "--max-states");
            }
            "--max-frontier" => {
                i += 1;
                config.max_frontier = flag_value(&args, i, "--max-frontier");
            }
            "--quiet" => config.info = false,
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: millrace [--max-time MS] [--max-states N] [--max-frontier N] [--quiet]");
                process::exit(1);
            }
        }
        i += 1;
    }
    config
}

/// Runs the request loop until stdin closes.
fn main() {
    let mut engine = Engine::new(parse_args());
    let stdin = io::stdin();
    let mut out = io::BufWriter::new(io::stdout().lock());
    let mut info = io::stderr().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if let Err(e) = engine.handle_line(&line, &mut out, &mut info) {
            eprintln!("output error: {}", e);
            break;
        }
    }
}
