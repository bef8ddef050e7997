//! Fixed-size BFS clustering (FHS).
//!
//! Repeatedly grows a bounded cluster around the highest-degree node left in
//! a working copy of the graph and consumes every edge inside the cluster.

use std::{
    collections::{BTreeSet, VecDeque},
    num::NonZeroUsize,
};

use tracing::{debug, instrument};

use crate::{
    Result,
    capacity::{CapacityPolicy, CapacityRedistributor},
    coarsener::Coarsening,
    error::CoarsenError,
    graph::{Graph, working::WorkingGraph},
    hypergraph::{CapacityAllocation, Hyperedge, Hypergraph},
    node::NodeId,
    strategy::HyperedgeStrategy,
};

/// Configuration for [`FixedSizeBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedSizeConfig {
    /// Maximum number of members per hyperedge. Must be at least one.
    pub max_hyperedge_size: usize,
    /// Split original edge capacities across memberships after
    /// construction, falling back to uniform shares when the graph has
    /// none.
    pub use_edge_capacity: bool,
}

impl Default for FixedSizeConfig {
    fn default() -> Self {
        Self {
            max_hyperedge_size: 5,
            use_edge_capacity: true,
        }
    }
}

/// Result of [`FixedSizeBuilder::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct FixedSizeRun {
    /// The coarsening, with BFS seeds as centres.
    pub coarsening: Coarsening,
    /// Canonical `(smaller, larger)` edges consumed by each hyperedge.
    pub consumed: Vec<Vec<(NodeId, NodeId)>>,
}

/// Builds bounded-size hyperedges by breadth-first growth.
///
/// # Examples
/// ```
/// use hypercoarse_core::{FixedSizeBuilder, FixedSizeConfig, Graph, HyperedgeStrategy, NodeId};
///
/// let graph = Graph::from_edges([
///     (NodeId::from(1), NodeId::from(2), None),
///     (NodeId::from(2), NodeId::from(3), None),
///     (NodeId::from(3), NodeId::from(4), None),
/// ])?;
/// let builder = FixedSizeBuilder::new(FixedSizeConfig {
///     max_hyperedge_size: 2,
///     use_edge_capacity: false,
/// })?;
/// let coarsening = builder.build(&graph)?;
/// assert_eq!(coarsening.hypergraph().len(), 3);
/// assert!(coarsening.hypergraph().hyperedges().iter().all(|edge| edge.len() <= 2));
/// # Ok::<(), hypercoarse_core::CoarsenError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedSizeBuilder {
    max_hyperedge_size: NonZeroUsize,
    use_edge_capacity: bool,
}

impl FixedSizeBuilder {
    /// Validates `config` and creates a builder.
    ///
    /// # Errors
    /// Returns [`CoarsenError::InvalidHyperedgeSize`] when
    /// `max_hyperedge_size` is zero.
    pub fn new(config: FixedSizeConfig) -> Result<Self> {
        let max_hyperedge_size = NonZeroUsize::new(config.max_hyperedge_size).ok_or(
            CoarsenError::InvalidHyperedgeSize {
                got: config.max_hyperedge_size,
            },
        )?;
        Ok(Self {
            max_hyperedge_size,
            use_edge_capacity: config.use_edge_capacity,
        })
    }

    /// Maximum number of members per hyperedge.
    #[must_use]
    pub const fn max_hyperedge_size(&self) -> NonZeroUsize {
        self.max_hyperedge_size
    }

    /// Runs the clustering loop and reports which edges each hyperedge
    /// consumed.
    ///
    /// Each iteration removes at least one edge, so the loop ends after at
    /// most `edge_count` iterations.
    ///
    /// # Errors
    /// Returns [`CoarsenError::NoProgress`] when a cluster contains no edge,
    /// which only happens with `max_hyperedge_size == 1` on a graph with
    /// edges.
    #[instrument(
        name = "core.strategy.fixed_size",
        err,
        skip(self, graph),
        fields(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            max_hyperedge_size = self.max_hyperedge_size.get(),
        ),
    )]
    pub fn run(&self, graph: &Graph) -> Result<FixedSizeRun> {
        let mut working = WorkingGraph::from_graph(graph);
        let mut hypergraph = Hypergraph::new();
        let mut seeds = Vec::new();
        let mut consumed = Vec::new();

        while let Some(seed) = working.highest_degree() {
            let members = self.collect_members(&working, seed);
            let mut internal = Vec::new();
            for &left in &members {
                for &right in working.neighbors(left).range(left + 1..) {
                    if members.contains(&right) {
                        internal.push((left, right));
                    }
                }
            }
            if internal.is_empty() {
                return Err(CoarsenError::NoProgress {
                    max_hyperedge_size: self.max_hyperedge_size.get(),
                    remaining_edges: working.edge_count(),
                });
            }

            for &(left, right) in &internal {
                working.remove_edge(left, right);
            }
            working.retire_isolated(members.iter().copied());

            let ids = members.iter().map(|&index| working.id(index).clone());
            if let Some(hyperedge) = Hyperedge::from_members(ids) {
                hypergraph.push(hyperedge);
                seeds.push(working.id(seed).clone());
                consumed.push(
                    internal
                        .iter()
                        .map(|&(left, right)| {
                            (working.id(left).clone(), working.id(right).clone())
                        })
                        .collect(),
                );
            }
        }
        debug!(hyperedges = hypergraph.len(), "fixed-size clustering finished");

        let allocation = if self.use_edge_capacity {
            CapacityRedistributor::new(CapacityPolicy::UniformFallback)
                .redistribute(graph, &hypergraph)?
        } else {
            CapacityAllocation::new()
        };
        Ok(FixedSizeRun {
            coarsening: Coarsening::new(self.name(), hypergraph, allocation, seeds),
            consumed,
        })
    }

    fn collect_members(&self, working: &WorkingGraph<'_>, seed: usize) -> BTreeSet<usize> {
        let limit = self.max_hyperedge_size.get();
        let mut visited = BTreeSet::from([seed]);
        let mut queue = VecDeque::from([seed]);
        while visited.len() < limit {
            let Some(current) = queue.pop_front() else {
                break;
            };
            for &neighbour in working.neighbors(current) {
                if visited.len() >= limit {
                    break;
                }
                if visited.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
        visited
    }
}

impl HyperedgeStrategy for FixedSizeBuilder {
    fn name(&self) -> &'static str {
        "fhs"
    }

    fn build(&self, graph: &Graph) -> Result<Coarsening> {
        self.run(graph).map(|run| run.coarsening)
    }
}
