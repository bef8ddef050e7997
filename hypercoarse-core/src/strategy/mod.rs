//! Hyperedge construction strategies.
//!
//! Every strategy reads the caller's [`Graph`] without mutating it and
//! returns a [`Coarsening`].

use std::fmt;

use crate::{Result, coarsener::Coarsening, graph::Graph};

pub mod fixed_size;
pub mod rollup;
pub mod supernode;
pub mod vertex_cover;

/// Builds a hypergraph from a pairwise graph.
///
/// # Examples
/// ```
/// use hypercoarse_core::{Graph, HyperedgeStrategy, NodeId, RollupBuilder};
///
/// let graph = Graph::from_edges([(NodeId::from(1), NodeId::from(2), None)])?;
/// let coarsening = RollupBuilder.build(&graph)?;
/// assert_eq!(RollupBuilder.name(), "rollup");
/// assert_eq!(coarsening.hypergraph().len(), 1);
/// # Ok::<(), hypercoarse_core::CoarsenError>(())
/// ```
pub trait HyperedgeStrategy: fmt::Debug + Send + Sync {
    /// Stable strategy name used in logs and summaries.
    fn name(&self) -> &'static str;

    /// Runs the strategy against `graph`.
    ///
    /// # Errors
    /// Propagates strategy-specific failures such as
    /// [`crate::CoarsenError::NoProgress`].
    fn build(&self, graph: &Graph) -> Result<Coarsening>;
}
