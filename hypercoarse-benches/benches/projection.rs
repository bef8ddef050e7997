//! Clique projection benchmarks.
//!
//! Coarsens once with the fixed-size strategy during setup and measures only
//! the projection of the resulting hypergraph.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use hypercoarse_benches::{
    error::BenchSetupError,
    graph::{SyntheticGraphConfig, generate},
    params::ProjectionBenchParams,
};
use hypercoarse_core::{
    CliqueProjector, CoarsenerBuilder, FixedSizeConfig, ProjectionConfig, StrategyConfig,
};

/// Seed used for all synthetic graph generation in this benchmark.
const SEED: u64 = 7;

/// Graph size used for every run.
const NODE_COUNT: usize = 5_000;

/// Hyperedge size limits to benchmark.
const HYPEREDGE_SIZES: &[usize] = &[3, 8, 32];

fn project_cliques_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let graph = generate(&SyntheticGraphConfig {
        node_count: NODE_COUNT,
        attachments: 4,
        seed: SEED,
    })?;
    let projector = CliqueProjector::new(ProjectionConfig::default());
    let mut group = c.benchmark_group("clique_projection");
    group.sample_size(20);

    for &max_hyperedge_size in HYPEREDGE_SIZES {
        let coarsening = CoarsenerBuilder::new()
            .with_strategy(StrategyConfig::FixedSize(FixedSizeConfig {
                max_hyperedge_size,
                use_edge_capacity: true,
            }))
            .build()?
            .run(&graph)?;
        let params = ProjectionBenchParams {
            node_count: NODE_COUNT,
            max_hyperedge_size,
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(&params),
            &coarsening,
            |b, coarsening| {
                b.iter(|| projector.project(coarsening.hypergraph(), coarsening.allocation()));
            },
        );
    }

    group.finish();
    Ok(())
}

fn project_cliques(c: &mut Criterion) {
    if let Err(err) = project_cliques_impl(c) {
        panic!("projection benchmark setup failed: {err}");
    }
}

criterion_group!(benches, project_cliques);
criterion_main!(benches);
