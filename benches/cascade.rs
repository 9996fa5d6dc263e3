use criterion::{black_box, criterion_group, criterion_main, Criterion};
use match_three::core::deadlock;
use match_three::core::matcher::find_all_matches;
use match_three::core::{Board, BoardConfig};
use match_three::engine::rank_swaps;

fn bench_fill(c: &mut Criterion) {
    c.bench_function("fill_initial_8x8", |b| {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        b.iter(|| {
            board.fill_initial();
        })
    });
}

fn bench_full_scan(c: &mut Criterion) {
    let board = Board::new(BoardConfig::default().with_seed(12345)).unwrap();
    c.bench_function("find_all_matches_8x8", |b| {
        b.iter(|| find_all_matches(black_box(board.grid())))
    });
}

fn bench_deadlock_scan(c: &mut Criterion) {
    let board = Board::new(BoardConfig::default().with_seed(12345)).unwrap();
    let mut grid = board.grid().clone();
    c.bench_function("count_moves_8x8", |b| {
        b.iter(|| deadlock::count_moves(black_box(&mut grid)))
    });
}

fn bench_rank_swaps(c: &mut Criterion) {
    let board = Board::new(BoardConfig::default().with_seed(12345)).unwrap();
    c.bench_function("rank_swaps_8x8", |b| b.iter(|| rank_swaps(black_box(board.grid()))));
}

fn bench_request_swap(c: &mut Criterion) {
    let mut board = Board::new(BoardConfig::default().with_seed(12345)).unwrap();
    c.bench_function("request_swap_with_cascade", |b| {
        b.iter(|| {
            if let Some((x, y)) = board.hint() {
                black_box(board.request_swap(x, y));
            } else {
                board.restart(board.seed().wrapping_add(1));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_fill,
    bench_full_scan,
    bench_deadlock_scan,
    bench_rank_swaps,
    bench_request_swap
);
criterion_main!(benches);
