//! Capacity redistribution across hyperedge memberships.
//!
//! Each node's deposit is the sum of the capacities of its incident edges in
//! the source graph. The deposit is split evenly over the hyperedges the node
//! belongs to.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::{
    Result,
    error::CoarsenError,
    graph::Graph,
    hypergraph::{CapacityAllocation, Hypergraph},
    node::NodeId,
};

/// How the redistributor behaves when the graph carries no capacity values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// Fail with [`CoarsenError::MissingCapacityAttribute`].
    #[default]
    Required,
    /// Assign `1/k` to each of a node's `k` memberships.
    UniformFallback,
}

/// Sums, per node, the capacities of all incident edges.
///
/// Edges without a recorded capacity contribute nothing. Nodes without any
/// capacitated edge are absent from the result.
///
/// # Examples
/// ```
/// use hypercoarse_core::{Graph, NodeId, node_totals};
///
/// let graph = Graph::from_edges([
///     (NodeId::from(1), NodeId::from(2), Some(10.0)),
///     (NodeId::from(1), NodeId::from(3), Some(5.0)),
/// ])?;
/// let totals = node_totals(&graph);
/// assert_eq!(totals.get(&NodeId::from(1)), Some(&15.0));
/// assert_eq!(totals.get(&NodeId::from(3)), Some(&5.0));
/// # Ok::<(), hypercoarse_core::CoarsenError>(())
/// ```
#[must_use]
pub fn node_totals(graph: &Graph) -> BTreeMap<NodeId, f64> {
    let mut totals: BTreeMap<NodeId, f64> = BTreeMap::new();
    for (left, right) in graph.edges() {
        let Some(capacity) = graph.capacity(left, right) else {
            continue;
        };
        *totals.entry(left.clone()).or_default() += capacity;
        *totals.entry(right.clone()).or_default() += capacity;
    }
    totals
}

/// Splits node capacity deposits across hyperedge memberships.
///
/// # Examples
/// ```
/// use hypercoarse_core::{
///     CapacityPolicy, CapacityRedistributor, Graph, Hyperedge, HyperedgeIndex, Hypergraph, NodeId,
/// };
///
/// let graph = Graph::from_edges([
///     (NodeId::from(1), NodeId::from(2), Some(10.0)),
///     (NodeId::from(1), NodeId::from(3), Some(20.0)),
/// ])?;
/// let hypergraph: Hypergraph = [vec![1, 2], vec![1, 3]]
///     .into_iter()
///     .filter_map(|members| Hyperedge::from_members(members.into_iter().map(NodeId::from)))
///     .collect();
/// let allocation = CapacityRedistributor::new(CapacityPolicy::Required)
///     .redistribute(&graph, &hypergraph)?;
/// assert_eq!(allocation.get(&NodeId::from(1), HyperedgeIndex::new(0)), Some(15.0));
/// assert_eq!(allocation.get(&NodeId::from(3), HyperedgeIndex::new(1)), Some(20.0));
/// # Ok::<(), hypercoarse_core::CoarsenError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CapacityRedistributor {
    policy: CapacityPolicy,
}

impl CapacityRedistributor {
    /// Creates a redistributor applying `policy` to graphs without
    /// capacities.
    #[must_use]
    pub const fn new(policy: CapacityPolicy) -> Self {
        Self { policy }
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    /// Computes a fresh allocation for every membership of `hypergraph`.
    ///
    /// A node whose deposit is zero or negative is treated as holding `1.0`
    /// so that each of its memberships stays positive.
    ///
    /// # Errors
    /// Returns [`CoarsenError::MissingCapacityAttribute`] when the graph has
    /// no capacity values and the policy is [`CapacityPolicy::Required`].
    #[instrument(
        name = "core.redistribute",
        err,
        skip(self, graph, hypergraph),
        fields(policy = ?self.policy, hyperedges = hypergraph.len()),
    )]
    pub fn redistribute(&self, graph: &Graph, hypergraph: &Hypergraph) -> Result<CapacityAllocation> {
        if !graph.has_capacity() {
            return match self.policy {
                CapacityPolicy::Required => Err(CoarsenError::MissingCapacityAttribute),
                CapacityPolicy::UniformFallback => {
                    debug!("graph has no capacities, using uniform deposits");
                    Ok(uniform_allocation(hypergraph))
                }
            };
        }
        let totals = node_totals(graph);
        Ok(split(hypergraph, |node| {
            let total = totals.get(node).copied().unwrap_or(0.0);
            if total <= 0.0 { 1.0 } else { total }
        }))
    }
}

/// Assigns `1/k` to each of a node's `k` memberships.
pub(crate) fn uniform_allocation(hypergraph: &Hypergraph) -> CapacityAllocation {
    split(hypergraph, |_| 1.0)
}

fn split<F>(hypergraph: &Hypergraph, deposit: F) -> CapacityAllocation
where
    F: Fn(&NodeId) -> f64,
{
    hypergraph
        .nodes()
        .flat_map(|node| {
            let memberships = hypergraph.memberships(node);
            let share = deposit(node) / memberships.len() as f64;
            memberships
                .iter()
                .map(move |&index| (node.clone(), index, share))
        })
        .collect()
}
