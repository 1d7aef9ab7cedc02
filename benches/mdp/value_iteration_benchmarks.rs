use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridworld_mdp::{Drift, GridWorld, GridWorldConfig};

/// Square board with a +1 exit in the top-right corner, a -1 exit below it
/// and a diagonal line of obstacles.
fn square_world(size: usize) -> GridWorldConfig {
    let mut config = GridWorldConfig::new(size, size, -0.04, 0.9, Drift::default())
        .with_terminal(0, size - 1, 1.0)
        .with_terminal(1, size - 1, -1.0)
        .with_max_sweeps(10_000);
    for i in 1..size - 1 {
        if i != size - 2 {
            config = config.with_obstacle(i, i);
        }
    }
    config
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_iteration_solve");
    for size in [4, 8, 16, 32] {
        let config = square_world(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &config, |b, config| {
            b.iter(|| {
                let mut world = GridWorld::new(black_box(config.clone())).unwrap();
                world.solve()
            })
        });
    }
    group.finish();
}

fn bench_single_sweep(c: &mut Criterion) {
    let config = square_world(64);
    c.bench_function("value_iteration_sweep_64", |b| {
        b.iter_batched(
            || GridWorld::new(config.clone()).unwrap(),
            |mut world| {
                world.step();
                world
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_solve, bench_single_sweep);
criterion_main!(benches);
