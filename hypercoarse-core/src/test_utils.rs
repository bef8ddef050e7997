//! Shared test utilities for `hypercoarse-core`.

use hypercoarse_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::{collection::vec, prelude::*, test_runner::Config as ProptestConfig};

use crate::{graph::Graph, node::NodeId};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `HYPERCOARSE_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds a graph from integer edge pairs, skipping self-loops.
pub(crate) fn graph_from_pairs(pairs: &[(i64, i64)]) -> Graph {
    let mut graph = Graph::new();
    for &(left, right) in pairs {
        if left != right {
            graph
                .add_edge(NodeId::from(left), NodeId::from(right), None)
                .expect("integer pairs without self-loops are valid edges");
        }
    }
    graph
}

/// Random simple graphs on up to `max_nodes` integer nodes.
pub(crate) fn arb_graph(max_nodes: i64, max_edges: usize) -> impl Strategy<Value = Graph> {
    vec((0..max_nodes, 0..max_nodes), 0..=max_edges)
        .prop_map(|pairs| graph_from_pairs(&pairs))
}

/// Random simple graphs whose edges all carry a capacity.
pub(crate) fn arb_capacitated_graph(
    max_nodes: i64,
    max_edges: usize,
) -> impl Strategy<Value = Graph> {
    vec((0..max_nodes, 0..max_nodes, 0.0_f64..1_000.0), 0..=max_edges).prop_map(|triples| {
        let mut graph = Graph::new();
        for (left, right, capacity) in triples {
            if left != right {
                graph
                    .add_edge(NodeId::from(left), NodeId::from(right), Some(capacity))
                    .expect("finite non-negative capacities are valid");
            }
        }
        graph
    })
}
