use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use sweeper_core::*;

fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    for (name, rows, cols, mines) in [
        ("beginner", 9, 9, 10),
        ("intermediate", 16, 16, 40),
        ("expert", 16, 30, 99),
    ] {
        let config = GameConfig::new((rows, cols), mines);
        group.bench_function(name, |b| {
            b.iter(|| RandomMinefieldGenerator::new(black_box(7), (0, 0)).generate(config))
        });
    }
    group.finish();
}

fn bench_first_reveal(c: &mut Criterion) {
    c.bench_function("first_reveal_expert", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut engine = Minesweeper::with_seed(seed);
            engine.start_game(16, 30, 99);
            black_box(engine.reveal_cell((8, 15)))
        })
    });
}

fn bench_flood_fill(c: &mut Criterion) {
    let layout = MineLayout::from_mine_coords((Coord::MAX, Coord::MAX), &[(0, 0)])
        .expect("mine inside the board");
    c.bench_function("flood_fill_max_board", |b| {
        b.iter(|| {
            let mut engine = Minesweeper::from_layout(layout.clone());
            black_box(engine.reveal_cell((128, 128)))
        })
    });
}

criterion_group!(benches, bench_placement, bench_first_reveal, bench_flood_fill);
criterion_main!(benches);
