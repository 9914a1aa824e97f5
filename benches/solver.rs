//! Benchmarks for the placement optimizer.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sugarboard::backtrack::Backtrack;
use sugarboard::csp::DomainBacktrack;
use sugarboard::exact_cover::ExactCover;
use sugarboard::pool::{build_context, PieceSpec, SearchContext};
use sugarboard::score::Grade;
use sugarboard::search::{Deadline, Strategy};
use sugarboard::solve_board;
use sugarboard::SolveRequest;

fn bench_request() -> SolveRequest {
    let piece = |modifier: &str, grade: Grade, shape_key: &str, quantity| PieceSpec {
        id: None,
        role: "dealer".to_string(),
        modifier: Some(modifier.to_string()),
        grade,
        shape_key: shape_key.to_string(),
        quantity,
    };

    SolveRequest {
        rows: 6,
        cols: 6,
        blocked: Vec::new(),
        pieces: vec![
            piece("radiance", Grade::SuperEpic, "5_plus", 1),
            piece("radiance", Grade::Epic, "4_square", 2),
            piece("piercing", Grade::Epic, "4_T_up", 1),
            piece("piercing", Grade::Rare, "3_bar_h", 2),
            piece("blessing", Grade::Rare, "2_bar_h", 2),
        ],
        role: "dealer".to_string(),
        time_limit_ms: 6_000,
    }
}

fn bench_context() -> SearchContext {
    let request = bench_request();
    build_context(
        request.rows,
        request.cols,
        &request.blocked,
        &request.pieces,
        "dealer",
    )
}

/// Benchmark context construction: placement enumeration plus indices.
fn bench_build_context(c: &mut Criterion) {
    let request = bench_request();
    c.bench_function("build_context", |b| {
        b.iter(|| {
            build_context(
                request.rows,
                request.cols,
                black_box(&request.blocked),
                black_box(&request.pieces),
                "dealer",
            )
        })
    });
}

/// Benchmark each strategy on its own cloned context.
fn bench_strategies(c: &mut Criterion) {
    let context = bench_context();
    let strategies: [&dyn Strategy; 3] = [&Backtrack, &ExactCover, &DomainBacktrack];

    let mut group = c.benchmark_group("strategies");
    group.sample_size(10);
    for strategy in strategies {
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                let mut ctx = context.clone();
                strategy.search(black_box(&mut ctx), Deadline::after(Duration::from_secs(30)))
            })
        });
    }
    group.finish();
}

/// Benchmark the complete three-strategy solve.
fn bench_solve(c: &mut Criterion) {
    let request = bench_request();
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    group.bench_function("best_of_three", |b| {
        b.iter(|| solve_board(black_box(&request)))
    });
    group.finish();
}

criterion_group!(benches, bench_build_context, bench_strategies, bench_solve);
criterion_main!(benches);
