//! Envelope reading and writing.
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use hypercoarse_core::{CapacityAllocation, Hyperedge, Hypergraph, NodeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    errors::HyperJsonError,
    keys::{AllocationKey, parse_key},
};

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    hyperedges: Vec<Vec<JsonNode>>,
    #[serde(default)]
    node_caps: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum JsonNode {
    Int(i64),
    Name(String),
}

impl From<&NodeId> for JsonNode {
    fn from(node: &NodeId) -> Self {
        match node {
            NodeId::Int(value) => Self::Int(*value),
            NodeId::Name(name) => Self::Name(name.to_string()),
        }
    }
}

impl From<JsonNode> for NodeId {
    fn from(node: JsonNode) -> Self {
        match node {
            JsonNode::Int(value) => Self::Int(value),
            JsonNode::Name(name) => Self::parse(&name),
        }
    }
}

/// A hypergraph with its allocation, as stored in a JSON envelope.
///
/// # Examples
/// ```
/// use hypercoarse_core::{HyperedgeIndex, NodeId};
/// use hypercoarse_providers_hyperjson::HyperJsonDocument;
///
/// let json = r#"{"hyperedges": [[1, 2], ["a", 3]], "node_caps": {"1|0": 5.0, "bogus": 1.0}}"#;
/// let document = HyperJsonDocument::from_reader(json.as_bytes()).expect("valid envelope");
/// assert_eq!(document.hypergraph().len(), 2);
/// assert_eq!(
///     document.allocation().get(&NodeId::from(1), HyperedgeIndex::new(0)),
///     Some(5.0)
/// );
/// assert_eq!(document.skipped_keys(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HyperJsonDocument {
    hypergraph: Hypergraph,
    allocation: CapacityAllocation,
    skipped_keys: usize,
}

impl HyperJsonDocument {
    /// Wraps a hypergraph and its allocation for writing.
    #[must_use]
    pub fn new(hypergraph: Hypergraph, allocation: CapacityAllocation) -> Self {
        Self {
            hypergraph,
            allocation,
            skipped_keys: 0,
        }
    }

    /// The stored hypergraph.
    #[must_use]
    pub fn hypergraph(&self) -> &Hypergraph {
        &self.hypergraph
    }

    /// The stored allocation.
    #[must_use]
    pub fn allocation(&self) -> &CapacityAllocation {
        &self.allocation
    }

    /// `node_caps` entries ignored while reading because their key was
    /// malformed or addressed a non-member.
    #[must_use]
    pub fn skipped_keys(&self) -> usize {
        self.skipped_keys
    }

    /// Splits the document into its hypergraph and allocation.
    #[must_use]
    pub fn into_parts(self) -> (Hypergraph, CapacityAllocation) {
        (self.hypergraph, self.allocation)
    }

    /// Reads an envelope from `path`.
    ///
    /// # Errors
    /// Returns [`HyperJsonError::Io`] when the file cannot be opened and
    /// otherwise the errors of [`Self::from_reader`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HyperJsonError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reads an envelope from `reader`.
    ///
    /// # Errors
    /// Returns [`HyperJsonError::Json`] for malformed JSON and
    /// [`HyperJsonError::EmptyHyperedge`] for an empty member list.
    #[instrument(name = "hyperjson.read", err, skip(reader))]
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, HyperJsonError> {
        let envelope: Envelope = serde_json::from_reader(reader)?;
        let mut hypergraph = Hypergraph::new();
        for (index, members) in envelope.hyperedges.into_iter().enumerate() {
            let hyperedge = Hyperedge::from_members(members.into_iter().map(NodeId::from))
                .ok_or(HyperJsonError::EmptyHyperedge { index })?;
            hypergraph.push(hyperedge);
        }

        let mut allocation = CapacityAllocation::new();
        let mut skipped_keys = 0_usize;
        for (raw, capacity) in envelope.node_caps {
            let Some(AllocationKey { node, index }) = parse_key(&raw) else {
                warn!(key = %raw, "skipping unparsable node_caps key");
                skipped_keys += 1;
                continue;
            };
            if !hypergraph
                .get(index)
                .is_some_and(|hyperedge| hyperedge.contains(&node))
            {
                warn!(key = %raw, "skipping node_caps entry for a non-member");
                skipped_keys += 1;
                continue;
            }
            allocation.insert(node, index, capacity);
        }
        debug!(
            hyperedges = hypergraph.len(),
            allocations = allocation.len(),
            skipped_keys,
            "hyperjson envelope read"
        );
        Ok(Self {
            hypergraph,
            allocation,
            skipped_keys,
        })
    }

    /// Writes the envelope to a new file at `path`.
    ///
    /// # Errors
    /// Returns [`HyperJsonError::Io`] or [`HyperJsonError::Json`] when
    /// writing fails.
    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<(), HyperJsonError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the envelope to `writer`.
    ///
    /// Integer identifiers are written as JSON numbers and names as
    /// strings; allocation keys use the `node|index` form.
    ///
    /// # Errors
    /// Returns [`HyperJsonError::Json`] when serialisation or the
    /// underlying write fails.
    #[instrument(
        name = "hyperjson.write",
        err,
        skip(self, writer),
        fields(hyperedges = self.hypergraph.len(), allocations = self.allocation.len()),
    )]
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), HyperJsonError> {
        let envelope = Envelope {
            hyperedges: self
                .hypergraph
                .hyperedges()
                .iter()
                .map(|hyperedge| hyperedge.members().map(JsonNode::from).collect())
                .collect(),
            node_caps: self
                .allocation
                .iter()
                .map(|(node, index, capacity)| {
                    let key = AllocationKey {
                        node: node.clone(),
                        index,
                    };
                    (key.to_string(), capacity)
                })
                .collect(),
        };
        serde_json::to_writer(writer, &envelope)?;
        Ok(())
    }
}
