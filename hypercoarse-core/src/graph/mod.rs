//! In-memory undirected graph model.
//!
//! The [`Graph`] stores adjacency as ordered sets so every traversal in the
//! crate visits nodes in ascending [`NodeId`] order. Builders that consume
//! edges never mutate the caller's graph; they operate on a private
//! [`working::WorkingGraph`] instead.

pub(crate) mod working;

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    Result,
    error::{CoarsenError, InvalidEdgeReason},
    node::NodeId,
};

/// Undirected simple graph with optional per-edge capacity.
///
/// # Examples
/// ```
/// use hypercoarse_core::{Graph, NodeId};
///
/// let mut graph = Graph::new();
/// graph.add_edge(NodeId::from(1), NodeId::from(2), Some(100.0))?;
/// graph.add_edge(NodeId::from(2), NodeId::from(3), None)?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.degree(&NodeId::from(2)), 2);
/// assert_eq!(graph.capacity(&NodeId::from(2), &NodeId::from(1)), Some(100.0));
/// # Ok::<(), hypercoarse_core::CoarsenError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    capacities: BTreeMap<(NodeId, NodeId), f64>,
    edge_count: usize,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from `(left, right, capacity)` triples.
    ///
    /// # Errors
    /// Returns [`CoarsenError::InvalidEdge`] for the first self-loop or
    /// invalid capacity encountered.
    ///
    /// # Examples
    /// ```
    /// use hypercoarse_core::{Graph, NodeId};
    ///
    /// let graph = Graph::from_edges([
    ///     (NodeId::from(1), NodeId::from(2), None),
    ///     (NodeId::from(2), NodeId::from(1), None),
    /// ])?;
    /// assert_eq!(graph.edge_count(), 1);
    /// # Ok::<(), hypercoarse_core::CoarsenError>(())
    /// ```
    pub fn from_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId, Option<f64>)>,
    {
        let mut graph = Self::new();
        for (left, right, capacity) in edges {
            graph.add_edge(left, right, capacity)?;
        }
        Ok(graph)
    }

    /// Adds an isolated node. Returns `false` when the node already exists.
    pub fn add_node(&mut self, node: NodeId) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, BTreeSet::new());
        true
    }

    /// Adds the undirected edge `{left, right}`.
    ///
    /// Adding an existing edge is a no-op apart from filling in a capacity
    /// when none was recorded before; the first recorded capacity wins.
    /// Returns `true` when the edge was newly inserted.
    ///
    /// # Errors
    /// Returns [`CoarsenError::InvalidEdge`] for self-loops and for negative
    /// or non-finite capacities.
    pub fn add_edge(
        &mut self,
        left: NodeId,
        right: NodeId,
        capacity: Option<f64>,
    ) -> Result<bool> {
        if left == right {
            return Err(CoarsenError::InvalidEdge {
                left,
                right,
                reason: InvalidEdgeReason::SelfLoop,
            });
        }
        if capacity.is_some_and(|value| !value.is_finite() || value < 0.0) {
            return Err(CoarsenError::InvalidEdge {
                left,
                right,
                reason: InvalidEdgeReason::InvalidCapacity,
            });
        }

        let key = canonical(&left, &right);
        let inserted = self
            .adjacency
            .entry(left.clone())
            .or_default()
            .insert(right.clone());
        self.adjacency.entry(right).or_default().insert(left);
        if inserted {
            self.edge_count += 1;
        }
        if let Some(value) = capacity {
            self.capacities.entry(key).or_insert(value);
        }
        Ok(inserted)
    }

    /// Returns whether `node` is present.
    #[must_use]
    pub fn contains_node(&self, node: &NodeId) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Returns whether the undirected edge `{left, right}` is present.
    #[must_use]
    pub fn contains_edge(&self, left: &NodeId, right: &NodeId) -> bool {
        self.adjacency
            .get(left)
            .is_some_and(|neighbours| neighbours.contains(right))
    }

    /// Number of distinct neighbours of `node`; zero for unknown nodes.
    #[must_use]
    pub fn degree(&self, node: &NodeId) -> usize {
        self.adjacency.get(node).map_or(0, BTreeSet::len)
    }

    /// Neighbour set of `node` in ascending order, or `None` for unknown
    /// nodes.
    #[must_use]
    pub fn neighbors(&self, node: &NodeId) -> Option<&BTreeSet<NodeId>> {
        self.adjacency.get(node)
    }

    /// Number of nodes, including isolated ones.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns `true` when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Iterates over nodes in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.adjacency.keys()
    }

    /// Iterates over edges as `(smaller, larger)` pairs in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.adjacency.iter().flat_map(|(node, neighbours)| {
            neighbours
                .range((
                    std::ops::Bound::Excluded(node),
                    std::ops::Bound::Unbounded,
                ))
                .map(move |neighbour| (node, neighbour))
        })
    }

    /// Removes `node` and every incident edge. Returns `false` for unknown
    /// nodes.
    pub fn remove_node(&mut self, node: &NodeId) -> bool {
        let Some(neighbours) = self.adjacency.remove(node) else {
            return false;
        };
        for neighbour in &neighbours {
            if let Some(set) = self.adjacency.get_mut(neighbour) {
                set.remove(node);
            }
            self.capacities.remove(&canonical(node, neighbour));
        }
        self.edge_count -= neighbours.len();
        true
    }

    /// Removes every listed edge that exists, leaving endpoints in place.
    /// Returns the number of edges removed.
    pub fn remove_edges<'a, I>(&mut self, edges: I) -> usize
    where
        I: IntoIterator<Item = (&'a NodeId, &'a NodeId)>,
    {
        let mut removed = 0;
        for (left, right) in edges {
            let present = self
                .adjacency
                .get_mut(left)
                .is_some_and(|set| set.remove(right));
            if !present {
                continue;
            }
            if let Some(set) = self.adjacency.get_mut(right) {
                set.remove(left);
            }
            self.capacities.remove(&canonical(left, right));
            removed += 1;
        }
        self.edge_count -= removed;
        removed
    }

    /// Capacity recorded for `{left, right}`, if any.
    #[must_use]
    pub fn capacity(&self, left: &NodeId, right: &NodeId) -> Option<f64> {
        self.capacities.get(&canonical(left, right)).copied()
    }

    /// Returns `true` when at least one edge carries a capacity.
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        !self.capacities.is_empty()
    }
}

fn canonical(left: &NodeId, right: &NodeId) -> (NodeId, NodeId) {
    if left <= right {
        (left.clone(), right.clone())
    } else {
        (right.clone(), left.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(value: i64) -> NodeId {
        NodeId::from(value)
    }

    fn path(len: i64) -> Graph {
        let mut graph = Graph::new();
        for node in 1..len {
            graph
                .add_edge(id(node), id(node + 1), Some(10.0))
                .expect("path edges are valid");
        }
        graph
    }

    #[test]
    fn add_edge_is_idempotent() {
        let mut graph = Graph::new();
        assert!(graph.add_edge(id(1), id(2), None).expect("valid edge"));
        assert!(!graph.add_edge(id(2), id(1), Some(5.0)).expect("valid edge"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.capacity(&id(1), &id(2)), Some(5.0));
        assert!(!graph.add_edge(id(1), id(2), Some(9.0)).expect("valid edge"));
        assert_eq!(graph.capacity(&id(1), &id(2)), Some(5.0));
    }

    #[rstest]
    #[case(id(1), id(1), None, InvalidEdgeReason::SelfLoop)]
    #[case(id(1), id(2), Some(-1.0), InvalidEdgeReason::InvalidCapacity)]
    #[case(id(1), id(2), Some(f64::NAN), InvalidEdgeReason::InvalidCapacity)]
    #[case(id(1), id(2), Some(f64::INFINITY), InvalidEdgeReason::InvalidCapacity)]
    fn add_edge_rejects_invalid_input(
        #[case] left: NodeId,
        #[case] right: NodeId,
        #[case] capacity: Option<f64>,
        #[case] expected: InvalidEdgeReason,
    ) {
        let mut graph = Graph::new();
        let err = graph
            .add_edge(left, right, capacity)
            .expect_err("edge must be rejected");
        assert!(
            matches!(err, CoarsenError::InvalidEdge { reason, .. } if reason == expected),
            "unexpected error: {err:?}"
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn edges_are_canonical_and_sorted() {
        let graph = Graph::from_edges([
            (id(3), id(1), None),
            (id(2), id(1), None),
            (id(3), id(2), None),
        ])
        .expect("valid edges");
        let edges: Vec<(i64, i64)> = graph
            .edges()
            .filter_map(|(u, v)| Some((u.rank_hint()?, v.rank_hint()?)))
            .collect();
        assert_eq!(edges, vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut graph = path(4);
        assert!(graph.remove_node(&id(2)));
        assert!(!graph.remove_node(&id(2)));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree(&id(1)), 0);
        assert_eq!(graph.capacity(&id(1), &id(2)), None);
        assert!(graph.contains_edge(&id(3), &id(4)));
    }

    #[test]
    fn remove_edges_ignores_missing_pairs() {
        let mut graph = path(4);
        let (one, two, three, nine) = (id(1), id(2), id(3), id(9));
        let removed = graph.remove_edges([(&two, &one), (&three, &nine), (&one, &two)]);
        assert_eq!(removed, 1);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_count(), 4);
        assert!(graph.has_capacity());
    }

    #[test]
    fn isolated_nodes_have_zero_degree() {
        let mut graph = Graph::new();
        assert!(graph.add_node(id(5)));
        assert!(!graph.add_node(id(5)));
        assert_eq!(graph.degree(&id(5)), 0);
        assert_eq!(graph.degree(&id(6)), 0);
        assert!(graph.neighbors(&id(6)).is_none());
        assert!(!graph.has_capacity());
    }
}
