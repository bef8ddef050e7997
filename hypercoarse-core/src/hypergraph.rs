//! Hypergraph artifacts produced by the coarsening strategies.
//!
//! A [`Hypergraph`] owns its hyperedges and a membership index that lists,
//! for every member node, the hyperedges containing it in construction
//! order. A [`CapacityAllocation`] assigns a capacity to each
//! `(node, hyperedge)` membership and is always replaced wholesale.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::node::NodeId;

/// Position of a hyperedge inside a [`Hypergraph`].
///
/// # Examples
/// ```
/// use hypercoarse_core::HyperedgeIndex;
///
/// let index = HyperedgeIndex::new(3);
/// assert_eq!(index.get(), 3);
/// assert_eq!(index.to_string(), "3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HyperedgeIndex(usize);

impl HyperedgeIndex {
    /// Wraps a raw position.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for HyperedgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for HyperedgeIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Non-empty set of distinct nodes, iterated in ascending order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Hyperedge {
    members: BTreeSet<NodeId>,
}

impl Hyperedge {
    /// Builds a hyperedge from `members`, collapsing duplicates.
    ///
    /// Returns `None` when no member is supplied.
    ///
    /// # Examples
    /// ```
    /// use hypercoarse_core::{Hyperedge, NodeId};
    ///
    /// let edge = Hyperedge::from_members([2, 1, 2].map(NodeId::from)).expect("non-empty");
    /// assert_eq!(edge.len(), 2);
    /// assert!(Hyperedge::from_members(Vec::<NodeId>::new()).is_none());
    /// ```
    #[must_use]
    pub fn from_members<I>(members: I) -> Option<Self>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let members: BTreeSet<NodeId> = members.into_iter().collect();
        (!members.is_empty()).then_some(Self { members })
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; hyperedges cannot be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns whether `node` is a member.
    #[must_use]
    pub fn contains(&self, node: &NodeId) -> bool {
        self.members.contains(node)
    }

    /// Members in ascending order.
    pub fn members(&self) -> impl ExactSizeIterator<Item = &NodeId> + DoubleEndedIterator {
        self.members.iter()
    }
}

/// Summary of hyperedge sizes.
///
/// `median` is the upper median, the element at position `count / 2` of the
/// sorted sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HypergraphStats {
    /// Number of hyperedges.
    pub count: usize,
    /// Smallest hyperedge size.
    pub min: usize,
    /// Largest hyperedge size.
    pub max: usize,
    /// Upper median hyperedge size.
    pub median: usize,
    /// Mean hyperedge size.
    pub mean: f64,
}

impl fmt::Display for HypergraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={} min={} max={} median={} mean={:.2}",
            self.count, self.min, self.max, self.median, self.mean
        )
    }
}

/// Ordered hyperedges plus the node membership index.
///
/// # Examples
/// ```
/// use hypercoarse_core::{Hyperedge, HyperedgeIndex, Hypergraph, NodeId};
///
/// let mut hypergraph = Hypergraph::new();
/// let first = hypergraph.push(Hyperedge::from_members([1, 2].map(NodeId::from)).expect("non-empty"));
/// hypergraph.push(Hyperedge::from_members([2, 3].map(NodeId::from)).expect("non-empty"));
/// assert_eq!(first, HyperedgeIndex::new(0));
/// assert_eq!(hypergraph.memberships(&NodeId::from(2)).len(), 2);
/// assert!(hypergraph.memberships(&NodeId::from(9)).is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hypergraph {
    hyperedges: Vec<Hyperedge>,
    membership: BTreeMap<NodeId, Vec<HyperedgeIndex>>,
}

impl Hypergraph {
    /// Creates an empty hypergraph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `hyperedge` and records its members. Returns its index.
    pub fn push(&mut self, hyperedge: Hyperedge) -> HyperedgeIndex {
        let index = HyperedgeIndex(self.hyperedges.len());
        for member in hyperedge.members() {
            self.membership
                .entry(member.clone())
                .or_default()
                .push(index);
        }
        self.hyperedges.push(hyperedge);
        index
    }

    /// Number of hyperedges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hyperedges.len()
    }

    /// Returns `true` when there are no hyperedges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hyperedges.is_empty()
    }

    /// Hyperedge at `index`, if any.
    #[must_use]
    pub fn get(&self, index: HyperedgeIndex) -> Option<&Hyperedge> {
        self.hyperedges.get(index.0)
    }

    /// Hyperedges in construction order.
    #[must_use]
    pub fn hyperedges(&self) -> &[Hyperedge] {
        &self.hyperedges
    }

    /// Hyperedges paired with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (HyperedgeIndex, &Hyperedge)> {
        self.hyperedges
            .iter()
            .enumerate()
            .map(|(index, edge)| (HyperedgeIndex(index), edge))
    }

    /// Hyperedges containing `node`, in construction order. Nodes outside
    /// every hyperedge yield an empty slice.
    #[must_use]
    pub fn memberships(&self, node: &NodeId) -> &[HyperedgeIndex] {
        self.membership.get(node).map_or(&[], Vec::as_slice)
    }

    /// Nodes belonging to at least one hyperedge, ascending.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.membership.keys()
    }

    /// Size summary, or `None` for an empty hypergraph.
    ///
    /// # Examples
    /// ```
    /// use hypercoarse_core::{Hyperedge, Hypergraph, NodeId};
    ///
    /// let mut hypergraph = Hypergraph::new();
    /// for members in [vec![1, 2], vec![1, 2, 3], vec![4, 5, 6, 7]] {
    ///     let edge = Hyperedge::from_members(members.into_iter().map(NodeId::from));
    ///     hypergraph.push(edge.expect("non-empty"));
    /// }
    /// let stats = hypergraph.stats().expect("non-empty hypergraph");
    /// assert_eq!((stats.count, stats.min, stats.max, stats.median), (3, 2, 4, 3));
    /// assert!((stats.mean - 3.0).abs() < f64::EPSILON);
    /// ```
    #[must_use]
    pub fn stats(&self) -> Option<HypergraphStats> {
        let mut sizes: Vec<usize> = self.hyperedges.iter().map(Hyperedge::len).collect();
        sizes.sort_unstable();
        let min = *sizes.first()?;
        let max = *sizes.last()?;
        let median = sizes[sizes.len() / 2];
        let total: usize = sizes.iter().sum();
        let mean = total as f64 / sizes.len() as f64;
        Some(HypergraphStats {
            count: sizes.len(),
            min,
            max,
            median,
            mean,
        })
    }
}

impl FromIterator<Hyperedge> for Hypergraph {
    fn from_iter<I: IntoIterator<Item = Hyperedge>>(iter: I) -> Self {
        let mut hypergraph = Self::new();
        for hyperedge in iter {
            hypergraph.push(hyperedge);
        }
        hypergraph
    }
}

/// Capacity assigned to each `(node, hyperedge)` membership.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CapacityAllocation {
    entries: BTreeMap<(NodeId, HyperedgeIndex), f64>,
}

impl CapacityAllocation {
    /// Creates an empty allocation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity of `node` in `hyperedge`, returning any previous
    /// value.
    pub fn insert(&mut self, node: NodeId, hyperedge: HyperedgeIndex, capacity: f64) -> Option<f64> {
        self.entries.insert((node, hyperedge), capacity)
    }

    /// Capacity of `node` in `hyperedge`, if assigned.
    #[must_use]
    pub fn get(&self, node: &NodeId, hyperedge: HyperedgeIndex) -> Option<f64> {
        self.entries.get(&(node.clone(), hyperedge)).copied()
    }

    /// Number of assigned memberships.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by node, then hyperedge.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, HyperedgeIndex, f64)> {
        self.entries
            .iter()
            .map(|((node, index), capacity)| (node, *index, *capacity))
    }

    /// Sum of every assigned capacity.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }
}

impl FromIterator<(NodeId, HyperedgeIndex, f64)> for CapacityAllocation {
    fn from_iter<I: IntoIterator<Item = (NodeId, HyperedgeIndex, f64)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(node, index, capacity)| ((node, index), capacity))
                .collect(),
        }
    }
}
