use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use maze_engine::{Maze, MazeConfig, RegionShape, Scale};

fn config(side: usize) -> MazeConfig {
    MazeConfig {
        width: side,
        height: side,
        start: RegionShape::Square(Scale::Small),
        finish: RegionShape::Horizontal(Scale::Small),
        logo: Some(RegionShape::Square(Scale::Medium)),
        seed: Some(42),
        ..MazeConfig::default()
    }
}

fn generate_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for side in [16usize, 48, 96] {
        let cfg = config(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &cfg, |b, cfg| {
            b.iter(|| Maze::generate(black_box(cfg)).expect("generation"));
        });
    }
    group.finish();
}

fn solve_large(c: &mut Criterion) {
    let mut maze = Maze::generate(&config(96)).expect("generation");
    c.bench_function("solve_96", |b| {
        b.iter(|| maze.solve().expect("solvable").len());
    });
}

criterion_group!(benches, generate_sizes, solve_large);
criterion_main!(benches);
