//! Benchmarks for planning and running pipelines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use govflow::config::EngineConfig;
use govflow::pipeline::{GovernanceEngine, StageManager};
use govflow::testing::{diamond, linear_chain};
use serde_json::json;

fn planning_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("execution_plan");
    for size in [10, 100, 1000] {
        let manager = StageManager::from_stages(linear_chain(size)).expect("valid chain");
        group.bench_with_input(BenchmarkId::new("linear_chain", size), &manager, |b, m| {
            b.iter(|| black_box(m.execution_plan()));
        });
    }
    group.finish();
}

fn run_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    let diamond_engine = GovernanceEngine::with_stages(
        EngineConfig::default().with_retain_history(false),
        diamond(),
    )
    .expect("valid diamond");
    c.bench_function("run_diamond", |b| {
        b.iter(|| runtime.block_on(diamond_engine.run_input(black_box(json!({"n": 1})))));
    });

    let chain_engine = GovernanceEngine::with_stages(
        EngineConfig::default().with_retain_history(false),
        linear_chain(50),
    )
    .expect("valid chain");
    c.bench_function("run_linear_chain_50", |b| {
        b.iter(|| runtime.block_on(chain_engine.run_input(black_box(json!(null)))));
    });
}

criterion_group!(benches, planning_benchmark, run_benchmark);
criterion_main!(benches);
