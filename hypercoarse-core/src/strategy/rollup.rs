//! Single-hyperedge rollup.

use tracing::instrument;

use crate::{
    Result,
    coarsener::Coarsening,
    graph::Graph,
    hypergraph::{CapacityAllocation, Hyperedge, Hypergraph},
    strategy::HyperedgeStrategy,
};

/// Places every node of the graph in one hyperedge with capacity `1.0`.
///
/// An empty graph yields an empty hypergraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RollupBuilder;

impl HyperedgeStrategy for RollupBuilder {
    fn name(&self) -> &'static str {
        "rollup"
    }

    #[instrument(
        name = "core.strategy.rollup",
        err,
        skip(self, graph),
        fields(nodes = graph.node_count()),
    )]
    fn build(&self, graph: &Graph) -> Result<Coarsening> {
        let mut hypergraph = Hypergraph::new();
        let mut allocation = CapacityAllocation::new();
        if let Some(hyperedge) = Hyperedge::from_members(graph.nodes().cloned()) {
            let index = hypergraph.push(hyperedge);
            for node in graph.nodes() {
                allocation.insert(node.clone(), index, 1.0);
            }
        }
        Ok(Coarsening::new(self.name(), hypergraph, allocation, Vec::new()))
    }
}
