//! Synthetic graphs for benchmarking.
//!
//! Graphs grow by preferential attachment from a small seed clique, which
//! yields the hub-heavy degree distribution of payment-channel networks.
//! Generation is seeded for reproducibility across benchmark runs.

use std::collections::BTreeSet;

use hypercoarse_core::{CoarsenError, Graph, NodeId};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during synthetic graph generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum SyntheticGraphError {
    /// Fewer than two nodes were requested.
    #[error("node count must be at least 2, got {got}")]
    TooFewNodes {
        /// Requested node count.
        got: usize,
    },
    /// The attachment count was zero.
    #[error("attachment count must be greater than zero")]
    ZeroAttachments,
    /// A node index did not fit an integer identifier.
    #[error("node index {index} does not fit an integer identifier")]
    IdOverflow {
        /// Offending node index.
        index: usize,
    },
    /// The graph model rejected a generated edge.
    #[error(transparent)]
    Graph(#[from] CoarsenError),
}

/// Configuration for synthetic graph generation.
#[derive(Clone, Debug)]
pub struct SyntheticGraphConfig {
    /// Number of nodes to generate.
    pub node_count: usize,
    /// Edges added per node after the seed clique.
    pub attachments: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates a capacitated graph from `config`.
///
/// # Errors
///
/// Returns [`SyntheticGraphError::TooFewNodes`] or
/// [`SyntheticGraphError::ZeroAttachments`] for degenerate configurations.
///
/// # Examples
///
/// ```
/// use hypercoarse_benches::graph::{SyntheticGraphConfig, generate};
///
/// let config = SyntheticGraphConfig { node_count: 50, attachments: 2, seed: 7 };
/// let graph = generate(&config).expect("valid config");
/// assert_eq!(graph.node_count(), 50);
/// assert!(graph.has_capacity());
/// ```
pub fn generate(config: &SyntheticGraphConfig) -> Result<Graph, SyntheticGraphError> {
    if config.node_count < 2 {
        return Err(SyntheticGraphError::TooFewNodes {
            got: config.node_count,
        });
    }
    if config.attachments == 0 {
        return Err(SyntheticGraphError::ZeroAttachments);
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut graph = Graph::new();
    // Each node appears once per incident edge, so uniform picks are
    // degree-proportional.
    let mut endpoints: Vec<usize> = Vec::new();

    let clique = config.attachments.saturating_add(1).min(config.node_count);
    for left in 0..clique {
        for right in (left + 1)..clique {
            connect(&mut graph, &mut rng, &mut endpoints, left, right)?;
        }
    }

    for node in clique..config.node_count {
        let wanted = config.attachments.min(node);
        let mut targets = BTreeSet::new();
        while targets.len() < wanted {
            let pick = rng.gen_range(0..endpoints.len());
            if let Some(&target) = endpoints.get(pick) {
                targets.insert(target);
            }
        }
        for target in targets {
            connect(&mut graph, &mut rng, &mut endpoints, node, target)?;
        }
    }
    Ok(graph)
}

fn connect(
    graph: &mut Graph,
    rng: &mut SmallRng,
    endpoints: &mut Vec<usize>,
    left: usize,
    right: usize,
) -> Result<(), SyntheticGraphError> {
    let capacity = rng.gen_range(1_000.0..1_000_000.0);
    graph.add_edge(node_id(left)?, node_id(right)?, Some(capacity))?;
    endpoints.push(left);
    endpoints.push(right);
    Ok(())
}

fn node_id(index: usize) -> Result<NodeId, SyntheticGraphError> {
    i64::try_from(index)
        .map(NodeId::from)
        .map_err(|_| SyntheticGraphError::IdOverflow { index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SyntheticGraphConfig { node_count: 1, attachments: 2, seed: 0 }, SyntheticGraphError::TooFewNodes { got: 1 })]
    #[case(SyntheticGraphConfig { node_count: 10, attachments: 0, seed: 0 }, SyntheticGraphError::ZeroAttachments)]
    fn degenerate_configs_are_rejected(
        #[case] config: SyntheticGraphConfig,
        #[case] expected: SyntheticGraphError,
    ) {
        assert_eq!(generate(&config).expect_err("config is degenerate"), expected);
    }

    #[rstest]
    #[case(2, 3, 1)]
    #[case(20, 1, 19)]
    #[case(100, 3, 6 + 96 * 3)]
    fn edge_counts_follow_attachment(
        #[case] node_count: usize,
        #[case] attachments: usize,
        #[case] edges: usize,
    ) {
        let graph = generate(&SyntheticGraphConfig {
            node_count,
            attachments,
            seed: 3,
        })
        .expect("valid config");
        assert_eq!(graph.node_count(), node_count);
        assert_eq!(graph.edge_count(), edges);
    }

    #[rstest]
    fn generation_is_seeded() {
        let config = SyntheticGraphConfig {
            node_count: 200,
            attachments: 2,
            seed: 42,
        };
        let first = generate(&config).expect("valid config");
        let second = generate(&config).expect("valid config");
        assert!(first.edges().eq(second.edges()));
    }
}
