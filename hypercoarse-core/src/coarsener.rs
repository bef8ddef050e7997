//! Coarsening orchestration.
//!
//! Provides the [`Coarsener`] entry point that runs one configured strategy
//! and the [`Coarsening`] artifact it returns.

use tracing::{info, instrument, warn};

use crate::{
    Result,
    capacity::{CapacityPolicy, CapacityRedistributor},
    error::CoarsenError,
    graph::Graph,
    hypergraph::{CapacityAllocation, Hypergraph},
    node::NodeId,
    strategy::HyperedgeStrategy,
};

/// Output of one strategy run.
///
/// `centres` lists, per hyperedge index, the node the hyperedge was grown
/// around (cover node, BFS seed, or supernode). Rollup output has no
/// centres. Advisories are non-fatal conditions such as a truncated cover.
#[derive(Clone, Debug, PartialEq)]
pub struct Coarsening {
    strategy: &'static str,
    hypergraph: Hypergraph,
    allocation: CapacityAllocation,
    centres: Vec<NodeId>,
    advisories: Vec<CoarsenError>,
}

impl Coarsening {
    pub(crate) fn new(
        strategy: &'static str,
        hypergraph: Hypergraph,
        allocation: CapacityAllocation,
        centres: Vec<NodeId>,
    ) -> Self {
        Self {
            strategy,
            hypergraph,
            allocation,
            centres,
            advisories: Vec::new(),
        }
    }

    pub(crate) fn with_advisory(mut self, advisory: CoarsenError) -> Self {
        warn!(
            strategy = self.strategy,
            code = %advisory.code(),
            "{advisory}"
        );
        self.advisories.push(advisory);
        self
    }

    /// Name of the strategy that produced this coarsening.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        self.strategy
    }

    /// The constructed hypergraph.
    #[must_use]
    pub fn hypergraph(&self) -> &Hypergraph {
        &self.hypergraph
    }

    /// The current capacity allocation.
    #[must_use]
    pub fn allocation(&self) -> &CapacityAllocation {
        &self.allocation
    }

    /// Centre node of each hyperedge, by index.
    #[must_use]
    pub fn centres(&self) -> &[NodeId] {
        &self.centres
    }

    /// Non-fatal conditions raised during construction.
    #[must_use]
    pub fn advisories(&self) -> &[CoarsenError] {
        &self.advisories
    }

    /// Replaces the allocation wholesale, returning the previous one.
    pub fn replace_allocation(&mut self, allocation: CapacityAllocation) -> CapacityAllocation {
        std::mem::replace(&mut self.allocation, allocation)
    }

    /// Fails with the first advisory, if any.
    ///
    /// # Errors
    /// Returns the first recorded advisory, for example
    /// [`CoarsenError::CoverSizeCapReached`].
    pub fn into_strict(self) -> Result<Self> {
        match self.advisories.first() {
            Some(advisory) => Err(advisory.clone()),
            None => Ok(self),
        }
    }

    /// Splits the coarsening into its hypergraph and allocation.
    #[must_use]
    pub fn into_parts(self) -> (Hypergraph, CapacityAllocation) {
        (self.hypergraph, self.allocation)
    }
}

/// Runs a configured strategy, optionally followed by capacity
/// redistribution.
///
/// # Examples
/// ```
/// use hypercoarse_core::{CapacityPolicy, CoarsenerBuilder, Graph, NodeId, StrategyConfig};
///
/// let graph = Graph::from_edges([
///     (NodeId::from(1), NodeId::from(2), Some(4.0)),
///     (NodeId::from(2), NodeId::from(3), Some(6.0)),
/// ])?;
/// let coarsener = CoarsenerBuilder::new()
///     .with_strategy(StrategyConfig::Rollup)
///     .with_redistribution(CapacityPolicy::Required)
///     .build()?;
/// let coarsening = coarsener.run(&graph)?;
/// assert_eq!(coarsening.strategy(), "rollup");
/// assert!((coarsening.allocation().total() - 20.0).abs() < 1e-9);
/// # Ok::<(), hypercoarse_core::CoarsenError>(())
/// ```
#[derive(Debug)]
pub struct Coarsener {
    strategy: Box<dyn HyperedgeStrategy>,
    redistribution: Option<CapacityPolicy>,
}

impl Coarsener {
    pub(crate) fn new(
        strategy: Box<dyn HyperedgeStrategy>,
        redistribution: Option<CapacityPolicy>,
    ) -> Self {
        Self {
            strategy,
            redistribution,
        }
    }

    /// Name of the configured strategy.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Redistribution policy applied after the strategy, if any.
    #[must_use]
    pub fn redistribution(&self) -> Option<CapacityPolicy> {
        self.redistribution
    }

    /// Runs the strategy against `graph`.
    ///
    /// # Errors
    /// Propagates strategy failures and
    /// [`CoarsenError::MissingCapacityAttribute`] from a required
    /// redistribution.
    #[instrument(
        name = "core.coarsen",
        err,
        skip(self, graph),
        fields(
            strategy = self.strategy.name(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
        ),
    )]
    pub fn run(&self, graph: &Graph) -> Result<Coarsening> {
        let mut coarsening = self.strategy.build(graph)?;
        if let Some(policy) = self.redistribution {
            let allocation =
                CapacityRedistributor::new(policy).redistribute(graph, coarsening.hypergraph())?;
            coarsening.replace_allocation(allocation);
        }
        info!(
            hyperedges = coarsening.hypergraph().len(),
            allocations = coarsening.allocation().len(),
            advisories = coarsening.advisories().len(),
            "coarsening completed"
        );
        Ok(coarsening)
    }
}
