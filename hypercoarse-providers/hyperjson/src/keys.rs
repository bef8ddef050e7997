//! `node_caps` key encoding.

use std::fmt;

use hypercoarse_core::{HyperedgeIndex, NodeId};

/// A `(node, hyperedge)` pair addressing one allocation entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationKey {
    /// Member node.
    pub node: NodeId,
    /// Hyperedge the entry belongs to.
    pub index: HyperedgeIndex,
}

impl fmt::Display for AllocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.node, self.index.get())
    }
}

/// Parses a `node_caps` key.
///
/// Accepts the current `node|index` form and the legacy tuple form
/// `(node, index)`, where the node may be quoted. The index is taken after
/// the last separator, so names may themselves contain `|` or `,`.
///
/// # Examples
/// ```
/// use hypercoarse_core::{HyperedgeIndex, NodeId};
/// use hypercoarse_providers_hyperjson::parse_key;
///
/// let key = parse_key("42|3").expect("pipe form");
/// assert_eq!((key.node, key.index), (NodeId::from(42), HyperedgeIndex::new(3)));
///
/// let legacy = parse_key("('03ab', 1)").expect("tuple form");
/// assert_eq!(legacy.node, NodeId::from("03ab"));
/// assert!(parse_key("nonsense").is_none());
/// ```
#[must_use]
pub fn parse_key(raw: &str) -> Option<AllocationKey> {
    let trimmed = raw.trim();
    let (node, index) = match trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(tuple) => tuple.rsplit_once(',')?,
        None => trimmed.rsplit_once('|')?,
    };
    let node = unquote(node.trim());
    if node.is_empty() {
        return None;
    }
    let index = index.trim().parse::<usize>().ok()?;
    Some(AllocationKey {
        node: NodeId::parse(node),
        index: HyperedgeIndex::new(index),
    })
}

fn unquote(raw: &str) -> &str {
    ['\'', '"']
        .iter()
        .find_map(|quote| raw.strip_prefix(*quote)?.strip_suffix(*quote))
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("7|0", NodeId::from(7), 0)]
    #[case(" 7 | 12 ", NodeId::from(7), 12)]
    #[case("a|b|4", NodeId::from("a|b"), 4)]
    #[case("(7, 2)", NodeId::from(7), 2)]
    #[case("('x,y', 5)", NodeId::from("x,y"), 5)]
    #[case("(\"02ff\", 0)", NodeId::from("02ff"), 0)]
    fn keys_parse(#[case] raw: &str, #[case] node: NodeId, #[case] index: usize) {
        let key = parse_key(raw).expect("key parses");
        assert_eq!(key.node, node);
        assert_eq!(key.index, HyperedgeIndex::new(index));
    }

    #[rstest]
    #[case("")]
    #[case("7")]
    #[case("7|x")]
    #[case("|3")]
    #[case("(7 2)")]
    #[case("7|-1")]
    fn malformed_keys_are_rejected(#[case] raw: &str) {
        assert!(parse_key(raw).is_none());
    }

    #[test]
    fn display_uses_pipe_form() {
        let key = AllocationKey {
            node: NodeId::from("n"),
            index: HyperedgeIndex::new(9),
        };
        assert_eq!(key.to_string(), "n|9");
        assert_eq!(parse_key(&key.to_string()), Some(key));
    }
}
