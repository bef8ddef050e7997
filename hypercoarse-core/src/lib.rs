//! Hypercoarse core library.
//!
//! Coarsens undirected pairwise networks into hypergraphs and projects
//! hypergraphs back onto directed pairwise edges.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod capacity;
mod clique;
mod coarsener;
mod error;
mod graph;
mod hypergraph;
mod node;
mod strategy;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{CoarsenerBuilder, StrategyConfig},
    capacity::{CapacityPolicy, CapacityRedistributor, node_totals},
    clique::{
        CliqueProjector, DEFAULT_MAX_CLIQUE_SIZE, FeeSchedule, PairwiseEdge, ProjectionConfig,
        SplitProjection,
    },
    coarsener::{Coarsener, Coarsening},
    error::{CoarsenError, CoarsenErrorCode, InvalidEdgeReason, Result},
    graph::Graph,
    hypergraph::{CapacityAllocation, Hyperedge, HyperedgeIndex, Hypergraph, HypergraphStats},
    node::NodeId,
    strategy::{
        HyperedgeStrategy,
        fixed_size::{FixedSizeBuilder, FixedSizeConfig, FixedSizeRun},
        rollup::RollupBuilder,
        supernode::{
            InconclusivePolicy, PathSearch, SupernodeBuilder, SupernodeConfig, SupernodeVerdict,
        },
        vertex_cover::{CoverSelection, VertexCoverBuilder, VertexCoverConfig},
    },
};
