//! Benchmark parameter types.

use std::fmt;

/// Parameters for a strategy benchmark run.
#[derive(Clone, Debug)]
pub struct StrategyBenchParams {
    /// Number of nodes in the synthetic graph.
    pub node_count: usize,
    /// Edges added per node after the seed clique.
    pub attachments: usize,
}

impl fmt::Display for StrategyBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},m={}", self.node_count, self.attachments)
    }
}

/// Parameters for a projection benchmark run.
#[derive(Clone, Debug)]
pub struct ProjectionBenchParams {
    /// Number of nodes in the synthetic graph.
    pub node_count: usize,
    /// Largest hyperedge produced by the fixed-size strategy.
    pub max_hyperedge_size: usize,
}

impl fmt::Display for ProjectionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.node_count, self.max_hyperedge_size)
    }
}
