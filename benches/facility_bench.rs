//! Criterion benchmarks for the facility location engines.
//!
//! Instances are random points on a square grid with Manhattan costs, so
//! the timings measure engine overhead rather than any dataset.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_facility::alns::{AlnsConfig, AlnsRunner};
use u_facility::listener::NoopListener;
use u_facility::problem::{Aggregate, Direction, FacilityProblem, Measure, ProblemType};
use u_facility::pso::{NdpsoConfig, NdpsoRunner};
use u_facility::random::create_rng;

fn grid_problem(n: usize, p: usize) -> FacilityProblem {
    let mut rng = create_rng(7);
    let points: Vec<(i64, i64)> = (0..n)
        .map(|_| (rng.random_range(0..100), rng.random_range(0..100)))
        .collect();
    let costs = points
        .iter()
        .map(|a| {
            points
                .iter()
                .map(|b| (a.0 - b.0).abs() + (a.1 - b.1).abs())
                .collect()
        })
        .collect();
    FacilityProblem::new(
        costs,
        p,
        ProblemType::new(Aggregate::Sum, Measure::Star),
        Direction::Minimize,
    )
    .expect("valid benchmark instance")
}

fn bench_objective(c: &mut Criterion) {
    let mut group = c.benchmark_group("objective");
    for &n in &[50, 200, 500] {
        let problem = grid_problem(n, n / 10);
        let facilities: Vec<usize> = (0..n / 10).map(|i| i * 10).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(problem, facilities),
            |b, (p, f)| b.iter(|| black_box(p.evaluate(black_box(f)))),
        );
    }
    group.finish();
}

fn bench_alns(c: &mut Criterion) {
    let mut group = c.benchmark_group("alns_p_median");
    group.sample_size(10);

    for &n in &[50, 100] {
        let problem = grid_problem(n, 5);
        let runner = AlnsRunner::new(
            AlnsConfig::default()
                .with_max_iterations(1000)
                .with_initial_search(20, 5)
                .with_seed(42),
        );
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(problem, runner),
            |b, (p, r)| {
                b.iter(|| {
                    let result = r.run(black_box(p), &mut NoopListener);
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_ndpso(c: &mut Criterion) {
    let mut group = c.benchmark_group("ndpso_p_median");
    group.sample_size(10);

    for &n in &[50, 100] {
        let problem = grid_problem(n, 5);
        let runner = NdpsoRunner::new(
            NdpsoConfig::default()
                .with_swarm_size(30)
                .with_max_iterations(100)
                .with_seed(42),
        );
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(problem, runner),
            |b, (p, r)| {
                b.iter(|| {
                    let result = r.run(black_box(p), &mut NoopListener);
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_objective, bench_alns, bench_ndpso);
criterion_main!(benches);
