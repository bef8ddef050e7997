//! Error types for the hypercoarse core library.
//!
//! Defines the error enum exposed by the public API, its stable codes, and a
//! convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::node::NodeId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Why an edge was rejected by the graph model.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InvalidEdgeReason {
    /// Both endpoints were the same node.
    SelfLoop,
    /// The capacity was negative, NaN, or infinite.
    InvalidCapacity,
}

impl fmt::Display for InvalidEdgeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop => f.write_str("self-loops are not allowed"),
            Self::InvalidCapacity => f.write_str("capacity must be finite and non-negative"),
        }
    }
}

/// Error type produced while building graphs, constructing hypergraphs, or
/// projecting them back to pairwise edges.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CoarsenError {
    /// An edge could not be added to the graph.
    #[error("invalid edge ({left}, {right}): {reason}")]
    InvalidEdge {
        /// First endpoint as supplied.
        left: NodeId,
        /// Second endpoint as supplied.
        right: NodeId,
        /// The rule the edge violated.
        reason: InvalidEdgeReason,
    },
    /// A hyperedge exceeded the clique projection threshold.
    #[error("hyperedge {index} has {size} members, exceeding the clique threshold {threshold}")]
    HyperedgeTooLarge {
        /// Position of the offending hyperedge.
        index: usize,
        /// Number of members in the offending hyperedge.
        size: usize,
        /// Maximum size accepted by the projector.
        threshold: usize,
    },
    /// Capacity redistribution required capacities but the graph has none.
    #[error("graph carries no capacity values and no uniform fallback was requested")]
    MissingCapacityAttribute,
    /// The vertex cover was truncated by its size cap before covering every edge.
    #[error("vertex cover stopped at its cap of {cap} nodes with {uncovered_edges} edges uncovered")]
    CoverSizeCapReached {
        /// Configured cover-size cap.
        cap: usize,
        /// Number of edges without an endpoint in the cover.
        uncovered_edges: usize,
    },
    /// The maximum hyperedge size must be at least one.
    #[error("max_hyperedge_size must be at least 1 (got {got})")]
    InvalidHyperedgeSize {
        /// The invalid size supplied by the caller.
        got: usize,
    },
    /// A supernode search bound was zero.
    #[error("supernode search bound `{parameter}` must be at least 1")]
    InvalidSearchBound {
        /// Name of the offending configuration field.
        parameter: &'static str,
    },
    /// Fixed-size clustering formed a hyperedge that consumed no edge.
    #[error(
        "fixed-size clustering made no progress with max_hyperedge_size {max_hyperedge_size} \
         ({remaining_edges} edges left)"
    )]
    NoProgress {
        /// Configured maximum hyperedge size.
        max_hyperedge_size: usize,
        /// Number of edges still present in the working graph.
        remaining_edges: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`CoarsenError`] variants.
    enum CoarsenErrorCode for CoarsenError {
        /// An edge could not be added to the graph.
        InvalidEdge => InvalidEdge { .. } => "COARSEN_INVALID_EDGE",
        /// A hyperedge exceeded the clique projection threshold.
        HyperedgeTooLarge => HyperedgeTooLarge { .. } => "COARSEN_HYPEREDGE_TOO_LARGE",
        /// Capacity redistribution required capacities but the graph has none.
        MissingCapacityAttribute => MissingCapacityAttribute => "COARSEN_MISSING_CAPACITY_ATTRIBUTE",
        /// The vertex cover was truncated by its size cap.
        CoverSizeCapReached => CoverSizeCapReached { .. } => "COARSEN_COVER_SIZE_CAP_REACHED",
        /// The maximum hyperedge size must be at least one.
        InvalidHyperedgeSize => InvalidHyperedgeSize { .. } => "COARSEN_INVALID_HYPEREDGE_SIZE",
        /// A supernode search bound was zero.
        InvalidSearchBound => InvalidSearchBound { .. } => "COARSEN_INVALID_SEARCH_BOUND",
        /// Fixed-size clustering formed a hyperedge that consumed no edge.
        NoProgress => NoProgress { .. } => "COARSEN_NO_PROGRESS",
    }
}

impl CoarsenError {
    /// Returns `true` for errors that describe partial results rather than
    /// failures.
    ///
    /// # Examples
    /// ```
    /// use hypercoarse_core::CoarsenError;
    ///
    /// let advisory = CoarsenError::CoverSizeCapReached { cap: 2, uncovered_edges: 1 };
    /// assert!(advisory.is_advisory());
    /// assert!(!CoarsenError::MissingCapacityAttribute.is_advisory());
    /// ```
    #[must_use]
    pub const fn is_advisory(&self) -> bool {
        matches!(self, Self::CoverSizeCapReached { .. })
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, CoarsenError>;
