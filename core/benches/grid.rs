use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tripwire_core::*;

fn generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, size, mines) in [
        ("small", (9, 9), 10),
        ("large", (26, 26), 225),
        ("dense", (26, 26), 600),
    ] {
        let config = GameConfig::new(size, mines).unwrap();
        group.bench_function(name, |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(GameGrid::generate(config, seed).unwrap())
            })
        });
    }
    group.finish();
}

fn flood_reveal(c: &mut Criterion) {
    // a single mine in the corner, the first reveal opens everything else
    let layout = MineLayout::from_mine_coords((255, 255), &[(254, 254)]).unwrap();
    let grid = GameGrid::new(layout);

    c.bench_function("flood_reveal_open_field", |b| {
        b.iter_batched(
            || grid.clone(),
            |mut grid| black_box(grid.reveal((0, 0)).unwrap()),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, generation, flood_reveal);
criterion_main!(benches);
