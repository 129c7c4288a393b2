use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use millrace::board::{Board, GameState, Move, NodeId, Phase, Player, Variant};
use millrace::execute::execute_move;
use millrace::morris;
use millrace::movegen::valid_moves;
use millrace::search::SearchOptions;

/// A mid-game Nine Men's Morris position with both hands empty.
fn midgame() -> GameState {
    let board = Arc::new(Board::nine_mens_morris());
    let ids = |names: &[&str]| -> Vec<NodeId> {
        names.iter().map(|n| board.node_id(n).unwrap()).collect()
    };
    let players = vec![
        Player { pieces: 0, places: ids(&["a", "b", "e", "j", "n", "s", "v"]), score: 0 },
        Player { pieces: 0, places: ids(&["c", "d", "f", "k", "o", "t", "x"]), score: 0 },
    ];
    GameState::from_parts(board.clone(), 0, Phase::MovePiece, players).unwrap()
}

fn bench_valid_moves_opening(c: &mut Criterion) {
    let state = GameState::from_variant(Variant::NineMensMorris);
    c.bench_function("valid_moves_opening", |b| {
        b.iter(|| valid_moves(black_box(&state)))
    });
}

fn bench_valid_moves_midgame(c: &mut Criterion) {
    let state = midgame();
    c.bench_function("valid_moves_midgame", |b| {
        b.iter(|| valid_moves(black_box(&state)))
    });
}

fn bench_execute_place(c: &mut Criterion) {
    let state = GameState::from_variant(Variant::NineMensMorris);
    let mv = Move::Place { node: NodeId(4) };
    c.bench_function("execute_place", |b| {
        b.iter(|| execute_move(black_box(&state), black_box(&mv)).unwrap())
    });
}

fn bench_execute_all_midgame(c: &mut Criterion) {
    let state = midgame();
    let moves = valid_moves(&state);
    c.bench_function("execute_all_midgame", |b| {
        b.iter(|| {
            for mv in &moves {
                black_box(execute_move(&state, mv).unwrap());
            }
        })
    });
}

fn bench_recalculate(c: &mut Criterion) {
    let state = midgame();
    let mut scratch = state.clone();
    c.bench_function("recalculate_midgame", |b| {
        b.iter(|| {
            scratch.clone_from(&state);
            scratch.recalculate();
        })
    });
}

fn bench_next_move_50ms(c: &mut Criterion) {
    let state = GameState::from_variant(Variant::NineMensMorris);
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));
    group.bench_function("next_move_opening_50ms", |b| {
        b.iter(|| {
            morris::next_move(black_box(&state), &SearchOptions::from_millis(50), &mut io::sink()).unwrap()
        })
    });
    group.finish();
}

fn bench_state_clone(c: &mut Criterion) {
    let state = midgame();
    c.bench_function("game_state_clone", |b| {
        b.iter(|| black_box(&state).clone())
    });
}

criterion_group!(
    benches,
    bench_valid_moves_opening,
    bench_valid_moves_midgame,
    bench_execute_place,
    bench_execute_all_midgame,
    bench_recalculate,
    bench_next_move_50ms,
    bench_state_clone,
);
criterion_main!(benches);
