//! Supernode elimination.
//!
//! A node is redundant when two of its neighbours already reach each other
//! without it, either directly or through a short monotone path inside the
//! node's two-hop neighbourhood. Surviving nodes are supernodes and their
//! neighbourhoods become hyperedges.
//!
//! The monotone-path search is bounded by a state budget. Running out of
//! budget is reported as [`PathSearch::Inconclusive`], never as absence.

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    num::NonZeroUsize,
};

use tracing::{debug, instrument};

use crate::{
    Result,
    capacity::uniform_allocation,
    coarsener::Coarsening,
    error::CoarsenError,
    graph::Graph,
    hypergraph::{Hyperedge, Hypergraph},
    node::NodeId,
    strategy::HyperedgeStrategy,
};

/// How an exhausted monotone-path search affects the candidate node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InconclusivePolicy {
    /// Treat the pair as unconnected and keep examining other pairs.
    #[default]
    KeepSupernode,
    /// Treat the node as redundant.
    DropSupernode,
}

/// Configuration for [`SupernodeBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupernodeConfig {
    /// Longest monotone path considered, in edges.
    pub max_search_depth: usize,
    /// Search states explored per pair before giving up.
    pub max_states: usize,
    /// Verdict for pairs whose search ran out of budget.
    pub inconclusive: InconclusivePolicy,
}

impl Default for SupernodeConfig {
    fn default() -> Self {
        Self {
            max_search_depth: 4,
            max_states: 5000,
            inconclusive: InconclusivePolicy::KeepSupernode,
        }
    }
}

/// Outcome of a bounded monotone-path search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathSearch {
    /// A qualifying path exists.
    Found,
    /// Every path within the depth bound was explored without success.
    Absent,
    /// The state budget ran out first.
    Inconclusive,
}

/// Why a node was kept or eliminated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SupernodeVerdict {
    /// The node survived every pair.
    Kept {
        /// Pairs whose search ran out of budget and were treated as
        /// unconnected.
        inconclusive_pairs: usize,
    },
    /// Two neighbours share an edge.
    DirectLink {
        /// First neighbour of the pair.
        left: NodeId,
        /// Second neighbour of the pair.
        right: NodeId,
    },
    /// Two neighbours are joined by a monotone path.
    MonotonePath {
        /// First neighbour of the pair.
        left: NodeId,
        /// Second neighbour of the pair.
        right: NodeId,
    },
    /// A search ran out of budget under [`InconclusivePolicy::DropSupernode`].
    InconclusiveDropped {
        /// First neighbour of the pair.
        left: NodeId,
        /// Second neighbour of the pair.
        right: NodeId,
    },
}

impl SupernodeVerdict {
    /// Returns `true` when the node survives as a supernode.
    #[must_use]
    pub const fn is_kept(&self) -> bool {
        matches!(self, Self::Kept { .. })
    }
}

/// Selects supernodes and builds one hyperedge per supernode.
///
/// # Examples
/// ```
/// use hypercoarse_core::{Graph, HyperedgeStrategy, NodeId, SupernodeBuilder, SupernodeConfig};
///
/// // Triangle 1-2-3 with the pendant 4 hanging off 3.
/// let graph = Graph::from_edges([
///     (NodeId::from(1), NodeId::from(2), None),
///     (NodeId::from(2), NodeId::from(3), None),
///     (NodeId::from(1), NodeId::from(3), None),
///     (NodeId::from(3), NodeId::from(4), None),
/// ])?;
/// let coarsening = SupernodeBuilder::new(SupernodeConfig::default())?.build(&graph)?;
/// // Only the leaf survives: it has fewer than two neighbours.
/// assert_eq!(coarsening.centres(), &[NodeId::from(4)]);
/// # Ok::<(), hypercoarse_core::CoarsenError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupernodeBuilder {
    max_search_depth: NonZeroUsize,
    max_states: NonZeroUsize,
    inconclusive: InconclusivePolicy,
}

impl SupernodeBuilder {
    /// Validates `config` and creates a builder.
    ///
    /// # Errors
    /// Returns [`CoarsenError::InvalidSearchBound`] when either bound is
    /// zero.
    pub fn new(config: SupernodeConfig) -> Result<Self> {
        let max_search_depth = NonZeroUsize::new(config.max_search_depth).ok_or(
            CoarsenError::InvalidSearchBound {
                parameter: "max_search_depth",
            },
        )?;
        let max_states =
            NonZeroUsize::new(config.max_states).ok_or(CoarsenError::InvalidSearchBound {
                parameter: "max_states",
            })?;
        Ok(Self {
            max_search_depth,
            max_states,
            inconclusive: config.inconclusive,
        })
    }

    /// Judges every node of `graph`, in ascending order.
    #[must_use]
    pub fn select(&self, graph: &Graph) -> BTreeMap<NodeId, SupernodeVerdict> {
        let ranks = Ranks::new(graph);
        graph
            .nodes()
            .map(|node| (node.clone(), self.judge(graph, &ranks, node)))
            .collect()
    }

    fn judge(&self, graph: &Graph, ranks: &Ranks<'_>, centre: &NodeId) -> SupernodeVerdict {
        let neighbours: Vec<&NodeId> = graph.neighbors(centre).into_iter().flatten().collect();
        let region = two_hop_region(graph, centre);
        let mut inconclusive_pairs = 0;
        for (position, &left) in neighbours.iter().enumerate() {
            for &right in neighbours.iter().skip(position + 1) {
                let pair = || (left.clone(), right.clone());
                if graph.contains_edge(left, right) {
                    let (left, right) = pair();
                    return SupernodeVerdict::DirectLink { left, right };
                }
                let search = MonotoneSearch {
                    graph,
                    ranks,
                    region: &region,
                    centre,
                    max_depth: self.max_search_depth.get(),
                    max_states: self.max_states.get(),
                };
                match (search.run(left, right), self.inconclusive) {
                    (PathSearch::Found, _) => {
                        let (left, right) = pair();
                        return SupernodeVerdict::MonotonePath { left, right };
                    }
                    (PathSearch::Inconclusive, InconclusivePolicy::DropSupernode) => {
                        let (left, right) = pair();
                        return SupernodeVerdict::InconclusiveDropped { left, right };
                    }
                    (PathSearch::Inconclusive, InconclusivePolicy::KeepSupernode) => {
                        inconclusive_pairs += 1;
                    }
                    (PathSearch::Absent, _) => {}
                }
            }
        }
        SupernodeVerdict::Kept { inconclusive_pairs }
    }

    /// Searches for a monotone path between two neighbours of `centre`.
    ///
    /// The path stays inside the two-hop region of `centre`, never passes
    /// through `centre` or `start`, has at most `max_search_depth` edges, and
    /// its internal nodes carry strictly decreasing ranks. Ranks are integer
    /// values for numeric ids. Named ids rank above every integer id, by
    /// their position in ascending node order.
    ///
    /// # Examples
    /// ```
    /// use hypercoarse_core::{Graph, NodeId, PathSearch, SupernodeBuilder, SupernodeConfig};
    ///
    /// // Square 1-2-3-4-1 around centre 1: neighbours 2 and 4 meet at 3.
    /// let graph = Graph::from_edges([
    ///     (NodeId::from(1), NodeId::from(2), None),
    ///     (NodeId::from(2), NodeId::from(3), None),
    ///     (NodeId::from(3), NodeId::from(4), None),
    ///     (NodeId::from(4), NodeId::from(1), None),
    /// ])?;
    /// let builder = SupernodeBuilder::new(SupernodeConfig::default())?;
    /// let found = builder.monotone_path(&graph, &NodeId::from(1), &NodeId::from(2), &NodeId::from(4));
    /// assert_eq!(found, PathSearch::Found);
    /// # Ok::<(), hypercoarse_core::CoarsenError>(())
    /// ```
    #[must_use]
    pub fn monotone_path(
        &self,
        graph: &Graph,
        centre: &NodeId,
        start: &NodeId,
        target: &NodeId,
    ) -> PathSearch {
        let ranks = Ranks::new(graph);
        let region = two_hop_region(graph, centre);
        MonotoneSearch {
            graph,
            ranks: &ranks,
            region: &region,
            centre,
            max_depth: self.max_search_depth.get(),
            max_states: self.max_states.get(),
        }
        .run(start, target)
    }
}

impl HyperedgeStrategy for SupernodeBuilder {
    fn name(&self) -> &'static str {
        "supernode"
    }

    #[instrument(
        name = "core.strategy.supernode",
        err,
        skip(self, graph),
        fields(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            max_search_depth = self.max_search_depth.get(),
            max_states = self.max_states.get(),
        ),
    )]
    fn build(&self, graph: &Graph) -> Result<Coarsening> {
        let verdicts = self.select(graph);
        let inconclusive: usize = verdicts
            .values()
            .map(|verdict| match verdict {
                SupernodeVerdict::Kept { inconclusive_pairs } => *inconclusive_pairs,
                SupernodeVerdict::InconclusiveDropped { .. } => 1,
                SupernodeVerdict::DirectLink { .. } | SupernodeVerdict::MonotonePath { .. } => 0,
            })
            .sum();

        let mut hypergraph = Hypergraph::new();
        let mut centres = Vec::new();
        for (node, verdict) in verdicts {
            if !verdict.is_kept() {
                continue;
            }
            let neighbours = graph.neighbors(&node).into_iter().flatten().cloned();
            if let Some(hyperedge) = Hyperedge::from_members(neighbours) {
                hypergraph.push(hyperedge);
                centres.push(node);
            }
        }
        debug!(
            supernodes = centres.len(),
            inconclusive_searches = inconclusive,
            "supernodes selected"
        );

        let allocation = uniform_allocation(&hypergraph);
        Ok(Coarsening::new(self.name(), hypergraph, allocation, centres))
    }
}

struct Ranks<'g> {
    by_node: BTreeMap<&'g NodeId, i128>,
}

impl<'g> Ranks<'g> {
    /// Named ids rank past the largest integer id so that ranks follow node
    /// order and never collide.
    fn new(graph: &'g Graph) -> Self {
        let after_ints = graph
            .nodes()
            .filter_map(NodeId::rank_hint)
            .max()
            .map_or(0, |max| i128::from(max) + 1);
        let by_node = graph
            .nodes()
            .enumerate()
            .map(|(position, node)| {
                let rank = node.rank_hint().map_or_else(
                    || after_ints.saturating_add(i128::try_from(position).unwrap_or(i128::MAX)),
                    i128::from,
                );
                (node, rank)
            })
            .collect();
        Self { by_node }
    }

    fn get(&self, node: &NodeId) -> i128 {
        self.by_node.get(node).copied().unwrap_or_default()
    }
}

fn two_hop_region<'g>(graph: &'g Graph, centre: &'g NodeId) -> BTreeSet<&'g NodeId> {
    let mut region = BTreeSet::from([centre]);
    for neighbour in graph.neighbors(centre).into_iter().flatten() {
        region.insert(neighbour);
        region.extend(graph.neighbors(neighbour).into_iter().flatten());
    }
    region
}

struct MonotoneSearch<'a> {
    graph: &'a Graph,
    ranks: &'a Ranks<'a>,
    region: &'a BTreeSet<&'a NodeId>,
    centre: &'a NodeId,
    max_depth: usize,
    max_states: usize,
}

impl MonotoneSearch<'_> {
    fn run(&self, start: &NodeId, target: &NodeId) -> PathSearch {
        if !self.region.contains(start) || !self.region.contains(target) {
            return PathSearch::Absent;
        }
        // States are (node, rank of the last internal node, depth).
        let mut queue: VecDeque<(&NodeId, Option<i128>, usize)> = VecDeque::from([(start, None, 0)]);
        let mut seen: BTreeSet<&NodeId> = BTreeSet::new();
        let mut explored = 0;
        while let Some((current, last_rank, depth)) = queue.pop_front() {
            explored += 1;
            if explored > self.max_states {
                return PathSearch::Inconclusive;
            }
            if depth >= self.max_depth {
                continue;
            }
            for neighbour in self.graph.neighbors(current).into_iter().flatten() {
                if neighbour == target {
                    return PathSearch::Found;
                }
                if neighbour == start
                    || neighbour == self.centre
                    || !self.region.contains(neighbour)
                {
                    continue;
                }
                let rank = self.ranks.get(neighbour);
                if last_rank.is_some_and(|last| rank >= last) {
                    continue;
                }
                if seen.insert(neighbour) {
                    queue.push_back((neighbour, Some(rank), depth + 1));
                }
            }
        }
        PathSearch::Absent
    }
}
