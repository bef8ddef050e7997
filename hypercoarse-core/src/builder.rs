//! Builder utilities for configuring coarsening runs.
//!
//! Exposes the strategy selection surface and the validation performed
//! before constructing [`Coarsener`] instances.

use crate::{
    Result,
    capacity::CapacityPolicy,
    coarsener::Coarsener,
    strategy::{
        HyperedgeStrategy,
        fixed_size::{FixedSizeBuilder, FixedSizeConfig},
        rollup::RollupBuilder,
        supernode::{SupernodeBuilder, SupernodeConfig},
        vertex_cover::{VertexCoverBuilder, VertexCoverConfig},
    },
};

/// Selects the hyperedge construction strategy and its parameters.
///
/// # Examples
/// ```
/// use hypercoarse_core::{FixedSizeConfig, StrategyConfig};
///
/// let strategy = StrategyConfig::FixedSize(FixedSizeConfig::default());
/// assert_eq!(strategy.name(), "fhs");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyConfig {
    /// Greedy vertex-cover hubs (NCH).
    VertexCover(VertexCoverConfig),
    /// Fixed-size BFS clustering (FHS).
    FixedSize(FixedSizeConfig),
    /// Supernode elimination.
    Supernode(SupernodeConfig),
    /// One hyperedge holding every node.
    Rollup,
}

impl StrategyConfig {
    /// Stable name of the selected strategy.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::VertexCover(_) => "nch",
            Self::FixedSize(_) => "fhs",
            Self::Supernode(_) => "supernode",
            Self::Rollup => "rollup",
        }
    }

    fn into_strategy(self) -> Result<Box<dyn HyperedgeStrategy>> {
        Ok(match self {
            Self::VertexCover(config) => Box::new(VertexCoverBuilder::new(config)),
            Self::FixedSize(config) => Box::new(FixedSizeBuilder::new(config)?),
            Self::Supernode(config) => Box::new(SupernodeBuilder::new(config)?),
            Self::Rollup => Box::new(RollupBuilder),
        })
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::VertexCover(VertexCoverConfig::default())
    }
}

/// Configures and constructs [`Coarsener`] instances.
///
/// # Examples
/// ```
/// use hypercoarse_core::{CapacityPolicy, CoarsenerBuilder, StrategyConfig, SupernodeConfig};
///
/// let coarsener = CoarsenerBuilder::new()
///     .with_strategy(StrategyConfig::Supernode(SupernodeConfig::default()))
///     .with_redistribution(CapacityPolicy::UniformFallback)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(coarsener.strategy_name(), "supernode");
/// assert_eq!(coarsener.redistribution(), Some(CapacityPolicy::UniformFallback));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoarsenerBuilder {
    strategy: StrategyConfig,
    redistribution: Option<CapacityPolicy>,
}

impl CoarsenerBuilder {
    /// Creates a builder selecting the vertex-cover strategy without
    /// redistribution.
    ///
    /// # Examples
    /// ```
    /// use hypercoarse_core::CoarsenerBuilder;
    ///
    /// let builder = CoarsenerBuilder::new();
    /// assert_eq!(builder.strategy().name(), "nch");
    /// assert_eq!(builder.redistribution(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the selected strategy.
    #[must_use]
    pub fn strategy(&self) -> StrategyConfig {
        self.strategy
    }

    /// Replaces the strategy's allocation with a redistribution pass using
    /// `policy`.
    #[must_use]
    pub fn with_redistribution(mut self, policy: CapacityPolicy) -> Self {
        self.redistribution = Some(policy);
        self
    }

    /// Keeps the allocation produced by the strategy itself.
    #[must_use]
    pub fn without_redistribution(mut self) -> Self {
        self.redistribution = None;
        self
    }

    /// Returns the redistribution policy, if any.
    #[must_use]
    pub fn redistribution(&self) -> Option<CapacityPolicy> {
        self.redistribution
    }

    /// Validates the configuration and constructs a [`Coarsener`].
    ///
    /// # Errors
    /// Returns [`crate::CoarsenError::InvalidHyperedgeSize`] or
    /// [`crate::CoarsenError::InvalidSearchBound`] for out-of-range strategy
    /// parameters.
    ///
    /// # Examples
    /// ```
    /// use hypercoarse_core::{CoarsenError, CoarsenerBuilder, FixedSizeConfig, StrategyConfig};
    ///
    /// let err = CoarsenerBuilder::new()
    ///     .with_strategy(StrategyConfig::FixedSize(FixedSizeConfig {
    ///         max_hyperedge_size: 0,
    ///         use_edge_capacity: true,
    ///     }))
    ///     .build()
    ///     .expect_err("zero size is invalid");
    /// assert_eq!(err, CoarsenError::InvalidHyperedgeSize { got: 0 });
    /// ```
    pub fn build(self) -> Result<Coarsener> {
        Ok(Coarsener::new(
            self.strategy.into_strategy()?,
            self.redistribution,
        ))
    }
}
