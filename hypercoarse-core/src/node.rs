//! Node identifiers shared by graphs and hypergraphs.

use std::{fmt, sync::Arc};

/// Identifier of a node in the source network.
///
/// Identifiers are either integers or names. The total order places every
/// integer before every name, compares integers numerically, and compares
/// names lexicographically. All tie-breaks in the crate use this order.
///
/// # Examples
/// ```
/// use hypercoarse_core::NodeId;
///
/// assert_eq!(NodeId::parse("42"), NodeId::from(42));
/// assert_eq!(NodeId::parse("alice"), NodeId::from("alice"));
/// assert!(NodeId::from(9) < NodeId::from(10));
/// assert!(NodeId::from(1_000) < NodeId::from("a"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    /// Numeric identifier.
    Int(i64),
    /// Textual identifier, such as a public key.
    ///
    /// Text that parses as an integer belongs in [`NodeId::Int`]; the `From`
    /// conversions for strings normalise through [`NodeId::parse`].
    Name(Arc<str>),
}

impl NodeId {
    /// Parses a raw token, yielding [`NodeId::Int`] for base-10 integers and
    /// [`NodeId::Name`] for everything else. Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Name(Arc::from(trimmed)), Self::Int)
    }

    /// Returns the integer value for numeric identifiers.
    #[must_use]
    pub const fn rank_hint(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Name(_) => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}
