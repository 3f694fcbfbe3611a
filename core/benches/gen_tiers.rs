use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use spoilsweeper_core::*;
use std::hint::black_box;

const TIERS: [(&str, Coord2, CellCount); 4] = [
    ("default", (8, 8), 13),
    ("largest", (40, 20), 160),
    ("dense", (40, 20), 780),
    ("full", (40, 20), 800),
];

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_game");
    for (name, size, mines) in TIERS {
        let settings = GameSettings::new_unchecked(size, mines, false);
        group.bench_with_input(BenchmarkId::from_parameter(name), &settings, |b, settings| {
            let mut rng = seeded(0);
            b.iter(|| {
                generate_game(black_box(settings), false, &RenderLimits::default(), &mut rng)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
