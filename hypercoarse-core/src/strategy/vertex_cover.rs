//! Greedy vertex-cover hyperedges (NCH).
//!
//! Hub nodes are picked greedily by degree on a working copy of the graph;
//! each hub's neighbourhood in the original graph becomes one hyperedge.

use std::num::NonZeroUsize;

use tracing::{debug, instrument};

use crate::{
    Result,
    coarsener::Coarsening,
    error::CoarsenError,
    graph::{Graph, working::WorkingGraph},
    hypergraph::{CapacityAllocation, Hyperedge, Hypergraph},
    node::NodeId,
    strategy::HyperedgeStrategy,
};

/// Configuration for [`VertexCoverBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VertexCoverConfig {
    /// Stop selecting hubs once the cover holds this many nodes.
    pub max_cover_size: Option<NonZeroUsize>,
}

/// Hubs chosen by the greedy cover, in selection order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverSelection {
    /// Selected nodes, highest degree first.
    pub nodes: Vec<NodeId>,
    /// Edges with no endpoint in the cover. Zero unless the cap truncated
    /// the selection.
    pub uncovered_edges: usize,
}

/// Builds one hyperedge per hub of a greedy vertex cover.
///
/// # Examples
/// ```
/// use hypercoarse_core::{Graph, HyperedgeStrategy, NodeId, VertexCoverBuilder, VertexCoverConfig};
///
/// // Star centred on 1 plus the pendant edge 4-5.
/// let graph = Graph::from_edges([
///     (NodeId::from(1), NodeId::from(2), None),
///     (NodeId::from(1), NodeId::from(3), None),
///     (NodeId::from(1), NodeId::from(4), None),
///     (NodeId::from(4), NodeId::from(5), None),
/// ])?;
/// let coarsening = VertexCoverBuilder::new(VertexCoverConfig::default()).build(&graph)?;
/// assert_eq!(coarsening.centres(), &[NodeId::from(1), NodeId::from(4)]);
/// assert_eq!(coarsening.hypergraph().len(), 2);
/// assert!(coarsening.allocation().is_empty());
/// # Ok::<(), hypercoarse_core::CoarsenError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VertexCoverBuilder {
    config: VertexCoverConfig,
}

impl VertexCoverBuilder {
    /// Creates a builder with `config`.
    #[must_use]
    pub const fn new(config: VertexCoverConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> VertexCoverConfig {
        self.config
    }

    /// Selects the cover: repeatedly takes the highest-degree node (lowest
    /// id on ties) and removes it with its incident edges.
    #[must_use]
    pub fn select_cover(&self, graph: &Graph) -> CoverSelection {
        let mut working = WorkingGraph::from_graph(graph);
        let mut nodes = Vec::new();
        while let Some(index) = working.highest_degree() {
            if self
                .config
                .max_cover_size
                .is_some_and(|cap| nodes.len() >= cap.get())
            {
                break;
            }
            nodes.push(working.id(index).clone());
            working.remove_node(index);
        }
        CoverSelection {
            nodes,
            uncovered_edges: working.edge_count(),
        }
    }
}

impl HyperedgeStrategy for VertexCoverBuilder {
    fn name(&self) -> &'static str {
        "nch"
    }

    #[instrument(
        name = "core.strategy.vertex_cover",
        err,
        skip(self, graph),
        fields(nodes = graph.node_count(), edges = graph.edge_count()),
    )]
    fn build(&self, graph: &Graph) -> Result<Coarsening> {
        let selection = self.select_cover(graph);
        debug!(
            cover = selection.nodes.len(),
            uncovered_edges = selection.uncovered_edges,
            "vertex cover selected"
        );

        let mut hubs = selection.nodes;
        hubs.sort();
        let mut hypergraph = Hypergraph::new();
        let mut centres = Vec::with_capacity(hubs.len());
        for hub in hubs {
            let neighbours = graph.neighbors(&hub).into_iter().flatten().cloned();
            if let Some(hyperedge) = Hyperedge::from_members(neighbours) {
                hypergraph.push(hyperedge);
                centres.push(hub);
            }
        }

        let coarsening =
            Coarsening::new(self.name(), hypergraph, CapacityAllocation::new(), centres);
        match self.config.max_cover_size {
            Some(cap) if selection.uncovered_edges > 0 => {
                Ok(coarsening.with_advisory(CoarsenError::CoverSizeCapReached {
                    cap: cap.get(),
                    uncovered_edges: selection.uncovered_edges,
                }))
            }
            _ => Ok(coarsening),
        }
    }
}
