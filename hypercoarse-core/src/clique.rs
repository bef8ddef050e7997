//! Clique projection of hypergraphs onto directed pairwise edges.
//!
//! A hyperedge with `k` members expands into `k * (k - 1)` directed edges,
//! so projection is guarded by a size threshold.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::{
    Result,
    error::CoarsenError,
    hypergraph::{CapacityAllocation, Hyperedge, HyperedgeIndex, Hypergraph},
    node::NodeId,
};

/// Largest hyperedge projected when no threshold is configured.
pub const DEFAULT_MAX_CLIQUE_SIZE: usize = 500;

/// Fee parameters attached to projected edges.
///
/// # Examples
/// ```
/// use hypercoarse_core::{FeeSchedule, NodeId};
///
/// let fees = FeeSchedule::default().with_base_fee_override(NodeId::from(7), 250.0);
/// assert_eq!(fees.base_fee_for(&NodeId::from(7)), 250.0);
/// assert_eq!(fees.base_fee_for(&NodeId::from(8)), 100.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FeeSchedule {
    /// Base fee used for sources without an override.
    pub base_fee: f64,
    /// Proportional fee rate.
    pub fee_rate: f64,
    /// Whether projected edges are enabled.
    pub enabled: bool,
    base_fee_overrides: BTreeMap<NodeId, f64>,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_fee: 100.0,
            fee_rate: 1.0,
            enabled: true,
            base_fee_overrides: BTreeMap::new(),
        }
    }
}

impl FeeSchedule {
    /// Sets the base fee charged on edges leaving `node`.
    #[must_use]
    pub fn with_base_fee_override(mut self, node: NodeId, base_fee: f64) -> Self {
        self.base_fee_overrides.insert(node, base_fee);
        self
    }

    /// Replaces every per-node base fee override.
    #[must_use]
    pub fn with_base_fee_overrides(mut self, overrides: BTreeMap<NodeId, f64>) -> Self {
        self.base_fee_overrides = overrides;
        self
    }

    /// Base fee for edges leaving `source`.
    #[must_use]
    pub fn base_fee_for(&self, source: &NodeId) -> f64 {
        self.base_fee_overrides
            .get(source)
            .copied()
            .unwrap_or(self.base_fee)
    }
}

/// Configuration for [`CliqueProjector`].
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionConfig {
    /// Largest hyperedge that may be projected.
    pub max_hyperedge_size: usize,
    /// Fees attached to every emitted edge.
    pub fees: FeeSchedule,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_hyperedge_size: DEFAULT_MAX_CLIQUE_SIZE,
            fees: FeeSchedule::default(),
        }
    }
}

/// One directed edge produced by projection.
#[derive(Clone, Debug, PartialEq)]
pub struct PairwiseEdge {
    /// Source member.
    pub source: NodeId,
    /// Target member.
    pub target: NodeId,
    /// Capacity of the source in the originating hyperedge.
    pub capacity: f64,
    /// Base fee.
    pub base_fee: f64,
    /// Proportional fee rate.
    pub fee_rate: f64,
    /// Whether the edge is enabled.
    pub enabled: bool,
}

/// Result of [`CliqueProjector::split_by_threshold`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitProjection {
    /// Edges projected from hyperedges at or below the threshold.
    pub edges: Vec<PairwiseEdge>,
    /// Number of hyperedges that were projected.
    pub projected_hyperedges: usize,
    /// Hyperedges above the threshold, re-indexed from zero.
    pub residual: Hypergraph,
    /// Allocation entries of the residual hyperedges under their new
    /// indices.
    pub residual_allocation: CapacityAllocation,
}

/// Expands hyperedges into directed member pairs.
///
/// # Examples
/// ```
/// use hypercoarse_core::{
///     CapacityAllocation, CliqueProjector, Hyperedge, Hypergraph, NodeId, ProjectionConfig,
/// };
///
/// let hypergraph: Hypergraph = Hyperedge::from_members([1, 2, 3].map(NodeId::from))
///     .into_iter()
///     .collect();
/// let edges = CliqueProjector::new(ProjectionConfig::default())
///     .project(&hypergraph, &CapacityAllocation::new())?;
/// assert_eq!(edges.len(), 6);
/// assert_eq!((edges[0].source.clone(), edges[0].target.clone()), (NodeId::from(1), NodeId::from(2)));
/// assert_eq!(edges[0].capacity, 1.0);
/// # Ok::<(), hypercoarse_core::CoarsenError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CliqueProjector {
    config: ProjectionConfig,
}

impl CliqueProjector {
    /// Creates a projector with `config`.
    #[must_use]
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Projects every hyperedge.
    ///
    /// Output is ordered by hyperedge index, then source member, then target
    /// member. Sources without an allocation entry get capacity `1.0`.
    ///
    /// # Errors
    /// Returns [`CoarsenError::HyperedgeTooLarge`] for the first hyperedge
    /// above the threshold. Sizes are checked before any edge is emitted.
    #[instrument(
        name = "core.project",
        err,
        skip(self, hypergraph, allocation),
        fields(
            hyperedges = hypergraph.len(),
            threshold = self.config.max_hyperedge_size,
        ),
    )]
    pub fn project(
        &self,
        hypergraph: &Hypergraph,
        allocation: &CapacityAllocation,
    ) -> Result<Vec<PairwiseEdge>> {
        let threshold = self.config.max_hyperedge_size;
        if let Some((index, hyperedge)) = hypergraph
            .iter()
            .find(|(_, hyperedge)| hyperedge.len() > threshold)
        {
            return Err(CoarsenError::HyperedgeTooLarge {
                index: index.get(),
                size: hyperedge.len(),
                threshold,
            });
        }

        let mut edges = Vec::with_capacity(pair_count(hypergraph.hyperedges().iter()));
        for (index, hyperedge) in hypergraph.iter() {
            self.expand(index, hyperedge, allocation, &mut edges);
        }
        debug!(edges = edges.len(), "hypergraph projected");
        Ok(edges)
    }

    /// Projects the hyperedges at or below the threshold and keeps the rest
    /// as a residual hypergraph.
    #[instrument(
        name = "core.project.split",
        skip(self, hypergraph, allocation),
        fields(
            hyperedges = hypergraph.len(),
            threshold = self.config.max_hyperedge_size,
        ),
    )]
    pub fn split_by_threshold(
        &self,
        hypergraph: &Hypergraph,
        allocation: &CapacityAllocation,
    ) -> SplitProjection {
        let threshold = self.config.max_hyperedge_size;
        let mut split = SplitProjection::default();
        for (index, hyperedge) in hypergraph.iter() {
            if hyperedge.len() <= threshold {
                self.expand(index, hyperedge, allocation, &mut split.edges);
                split.projected_hyperedges += 1;
                continue;
            }
            let residual_index = split.residual.push(hyperedge.clone());
            for member in hyperedge.members() {
                if let Some(capacity) = allocation.get(member, index) {
                    split
                        .residual_allocation
                        .insert(member.clone(), residual_index, capacity);
                }
            }
        }
        debug!(
            edges = split.edges.len(),
            projected = split.projected_hyperedges,
            residual = split.residual.len(),
            "hypergraph split"
        );
        split
    }

    fn expand(
        &self,
        index: HyperedgeIndex,
        hyperedge: &Hyperedge,
        allocation: &CapacityAllocation,
        out: &mut Vec<PairwiseEdge>,
    ) {
        let fees = &self.config.fees;
        for source in hyperedge.members() {
            let capacity = allocation.get(source, index).unwrap_or(1.0);
            let base_fee = fees.base_fee_for(source);
            for target in hyperedge.members().filter(|target| *target != source) {
                out.push(PairwiseEdge {
                    source: source.clone(),
                    target: target.clone(),
                    capacity,
                    base_fee,
                    fee_rate: fees.fee_rate,
                    enabled: fees.enabled,
                });
            }
        }
    }
}

fn pair_count<'a, I>(hyperedges: I) -> usize
where
    I: Iterator<Item = &'a Hyperedge>,
{
    hyperedges
        .map(|hyperedge| hyperedge.len() * hyperedge.len().saturating_sub(1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::suite_proptest_config;
    use proptest::{collection::btree_set, prelude::*};
    use std::collections::BTreeSet;

    fn edge(members: &[i64]) -> Hyperedge {
        Hyperedge::from_members(members.iter().copied().map(NodeId::from))
            .expect("test hyperedges are non-empty")
    }

    fn projector(max_hyperedge_size: usize) -> CliqueProjector {
        CliqueProjector::new(ProjectionConfig {
            max_hyperedge_size,
            ..ProjectionConfig::default()
        })
    }

    #[test]
    fn allocation_sets_source_capacity() {
        let hypergraph: Hypergraph = [edge(&[1, 2]), edge(&[2, 3])].into_iter().collect();
        let allocation: CapacityAllocation = [
            (NodeId::from(1), HyperedgeIndex::new(0), 5.0),
            (NodeId::from(2), HyperedgeIndex::new(1), 7.0),
        ]
        .into_iter()
        .collect();
        let edges = projector(2)
            .project(&hypergraph, &allocation)
            .expect("sizes are within threshold");
        let capacities: Vec<(i64, i64, f64)> = edges
            .iter()
            .filter_map(|edge| {
                Some((edge.source.rank_hint()?, edge.target.rank_hint()?, edge.capacity))
            })
            .collect();
        assert_eq!(
            capacities,
            vec![(1, 2, 5.0), (2, 1, 1.0), (2, 3, 7.0), (3, 2, 1.0)]
        );
        assert!(edges.iter().all(|edge| edge.enabled && edge.fee_rate == 1.0));
    }

    #[test]
    fn oversized_hyperedge_fails_without_output() {
        let hypergraph: Hypergraph = [edge(&[1, 2]), edge(&[1, 2, 3, 4])].into_iter().collect();
        let err = projector(3)
            .project(&hypergraph, &CapacityAllocation::new())
            .expect_err("size four exceeds three");
        assert_eq!(
            err,
            CoarsenError::HyperedgeTooLarge {
                index: 1,
                size: 4,
                threshold: 3
            }
        );
    }

    #[test]
    fn base_fee_overrides_apply_per_source() {
        let hypergraph: Hypergraph = [edge(&[1, 2])].into_iter().collect();
        let projector = CliqueProjector::new(ProjectionConfig {
            max_hyperedge_size: 2,
            fees: FeeSchedule::default().with_base_fee_override(NodeId::from(2), 42.0),
        });
        let edges = projector
            .project(&hypergraph, &CapacityAllocation::new())
            .expect("sizes are within threshold");
        let fees: Vec<f64> = edges.iter().map(|edge| edge.base_fee).collect();
        assert_eq!(fees, vec![100.0, 42.0]);
    }

    #[test]
    fn split_reindexes_residual_hyperedges() {
        let hypergraph: Hypergraph = [edge(&[1, 2, 3]), edge(&[4, 5]), edge(&[6, 7, 8])]
            .into_iter()
            .collect();
        let allocation: CapacityAllocation = [
            (NodeId::from(1), HyperedgeIndex::new(0), 2.0),
            (NodeId::from(6), HyperedgeIndex::new(2), 3.0),
            (NodeId::from(4), HyperedgeIndex::new(1), 9.0),
        ]
        .into_iter()
        .collect();
        let split = projector(2).split_by_threshold(&hypergraph, &allocation);
        assert_eq!(split.projected_hyperedges, 1);
        assert_eq!(split.edges.len(), 2);
        assert_eq!(split.residual.len(), 2);
        assert_eq!(
            split.residual_allocation.get(&NodeId::from(6), HyperedgeIndex::new(1)),
            Some(3.0)
        );
        assert_eq!(
            split.residual_allocation.get(&NodeId::from(1), HyperedgeIndex::new(0)),
            Some(2.0)
        );
        assert_eq!(split.residual_allocation.len(), 2);
    }

    proptest! {
        #![proptest_config(suite_proptest_config(64))]

        #[test]
        fn projection_emits_every_ordered_pair_once(members in btree_set(0_i64..200, 1..40)) {
            let hyperedge = Hyperedge::from_members(members.iter().copied().map(NodeId::from))
                .expect("generated sets are non-empty");
            let k = hyperedge.len();
            let hypergraph: Hypergraph = [hyperedge].into_iter().collect();
            let edges = projector(k)
                .project(&hypergraph, &CapacityAllocation::new())
                .expect("threshold equals size");
            prop_assert_eq!(edges.len(), k * (k - 1));
            let pairs: BTreeSet<(NodeId, NodeId)> = edges
                .iter()
                .map(|edge| (edge.source.clone(), edge.target.clone()))
                .collect();
            prop_assert_eq!(pairs.len(), edges.len());
            prop_assert!(edges.iter().all(|edge| edge.source != edge.target));
        }

        #[test]
        fn threshold_plus_one_is_rejected(threshold in 1_usize..30) {
            let members = (0..=threshold).map(|value| NodeId::from(i64::try_from(value).unwrap_or(i64::MAX)));
            let hyperedge = Hyperedge::from_members(members).expect("non-empty");
            let hypergraph: Hypergraph = [hyperedge].into_iter().collect();
            let result = projector(threshold).project(&hypergraph, &CapacityAllocation::new());
            prop_assert_eq!(
                result,
                Err(CoarsenError::HyperedgeTooLarge { index: 0, size: threshold + 1, threshold })
            );
        }
    }
}
