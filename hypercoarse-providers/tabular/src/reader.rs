//! Edge-table ingestion into the core graph model.
use std::{collections::BTreeMap, fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord};
use hypercoarse_core::{Graph, NodeId};
use tracing::{debug, instrument};

use crate::{columns::ColumnLayout, errors::TabularError};

/// Options controlling which rows of an edge table are kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeTableOptions {
    /// Keep rows whose `disabled` column is set.
    pub include_disabled: bool,
}

/// Graph read from an edge table plus the per-node fee profile.
#[derive(Clone, Debug)]
pub struct EdgeTable {
    graph: Graph,
    base_fees: BTreeMap<NodeId, f64>,
    rows: usize,
    disabled_rows: usize,
}

impl EdgeTable {
    /// The deduplicated undirected graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Consumes the table, returning the graph.
    #[must_use]
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Mean base fee per endpoint node, empty without a fee column.
    ///
    /// Each row's fee counts towards both of its endpoints.
    #[must_use]
    pub fn base_fees(&self) -> &BTreeMap<NodeId, f64> {
        &self.base_fees
    }

    /// Data rows read, including skipped ones.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rows dropped because they were disabled.
    #[must_use]
    pub fn disabled_rows(&self) -> usize {
        self.disabled_rows
    }
}

/// Reads delimited edge tables with a header row.
///
/// Rows sharing an unordered node pair are parallel channels: their
/// capacities are summed into one undirected edge.
///
/// # Examples
/// ```
/// use hypercoarse_core::NodeId;
/// use hypercoarse_providers_tabular::{EdgeTableOptions, EdgeTableReader};
///
/// let data = "src,trg,capacity\n1,2,10\n2,1,5\n2,3,7\n";
/// let table = EdgeTableReader::new(EdgeTableOptions::default())
///     .read_from(data.as_bytes())
///     .expect("valid table");
/// assert_eq!(table.graph().edge_count(), 2);
/// assert_eq!(table.graph().capacity(&NodeId::from(1), &NodeId::from(2)), Some(15.0));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeTableReader {
    options: EdgeTableOptions,
}

impl EdgeTableReader {
    /// Creates a reader with `options`.
    #[must_use]
    pub fn new(options: EdgeTableOptions) -> Self {
        Self { options }
    }

    /// Reads the table stored at `path`.
    ///
    /// # Errors
    /// Returns [`TabularError::Io`] when the file cannot be opened and
    /// otherwise the errors of [`Self::read_from`].
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<EdgeTable, TabularError> {
        let file = File::open(path)?;
        self.read_from(file)
    }

    /// Reads a table from `reader`.
    ///
    /// # Errors
    /// Returns [`TabularError::MissingEndpointColumns`] for unusable headers,
    /// [`TabularError::SelfLoop`], [`TabularError::EmptyEndpoint`] or
    /// [`TabularError::InvalidNumber`] for malformed rows, and
    /// [`TabularError::Graph`] for capacities the graph model rejects.
    #[instrument(
        name = "tabular.read",
        err,
        skip(self, reader),
        fields(include_disabled = self.options.include_disabled),
    )]
    pub fn read_from<R: Read>(&self, reader: R) -> Result<EdgeTable, TabularError> {
        let mut table = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = table.headers()?.clone();
        let layout = ColumnLayout::detect(&headers)?;
        debug!(?layout, "edge table columns detected");

        let mut channels: BTreeMap<(NodeId, NodeId), Option<f64>> = BTreeMap::new();
        let mut fees = FeeProfile::default();
        let mut rows = 0_usize;
        let mut disabled_rows = 0_usize;
        let mut record = StringRecord::new();
        while table.read_record(&mut record)? {
            rows += 1;
            let row = Row {
                record: &record,
                headers: &headers,
                line: record.position().map_or(0, csv::Position::line),
            };
            let disabled = layout.disabled.is_some_and(|at| row.flag(at));
            if disabled && !self.options.include_disabled {
                disabled_rows += 1;
                continue;
            }
            let left = row.endpoint(layout.left)?;
            let right = row.endpoint(layout.right)?;
            if left == right {
                return Err(TabularError::SelfLoop {
                    line: row.line,
                    node: left,
                });
            }
            if let Some(base_fee) = row.optional_number(layout.base_fee)? {
                fees.observe(&left, base_fee);
                fees.observe(&right, base_fee);
            }
            let capacity = row.optional_number(layout.capacity)?;
            let key = if left <= right { (left, right) } else { (right, left) };
            let entry = channels.entry(key).or_insert(None);
            if let Some(capacity) = capacity {
                *entry = Some(entry.unwrap_or(0.0) + capacity);
            }
        }

        let graph = Graph::from_edges(
            channels
                .into_iter()
                .map(|((left, right), capacity)| (left, right, capacity)),
        )?;
        debug!(
            rows,
            disabled_rows,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "edge table loaded"
        );
        Ok(EdgeTable {
            graph,
            base_fees: fees.into_means(),
            rows,
            disabled_rows,
        })
    }
}

struct Row<'a> {
    record: &'a StringRecord,
    headers: &'a StringRecord,
    line: u64,
}

impl Row<'_> {
    fn cell(&self, index: usize) -> &str {
        self.record.get(index).map_or("", str::trim)
    }

    fn endpoint(&self, index: usize) -> Result<NodeId, TabularError> {
        let raw = self.cell(index);
        if raw.is_empty() {
            return Err(TabularError::EmptyEndpoint {
                line: self.line,
                column: ColumnLayout::name(self.headers, index),
            });
        }
        Ok(NodeId::parse(raw))
    }

    /// Empty cells read as absent.
    fn number(&self, index: usize) -> Result<Option<f64>, TabularError> {
        let raw = self.cell(index);
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| TabularError::InvalidNumber {
                line: self.line,
                column: ColumnLayout::name(self.headers, index),
                value: raw.to_owned(),
            })
    }

    fn optional_number(&self, index: Option<usize>) -> Result<Option<f64>, TabularError> {
        Ok(index.map(|at| self.number(at)).transpose()?.flatten())
    }

    fn flag(&self, index: usize) -> bool {
        let raw = self.cell(index);
        raw == "1" || raw.eq_ignore_ascii_case("true")
    }
}

#[derive(Default)]
struct FeeProfile {
    sums: BTreeMap<NodeId, (f64, u32)>,
}

impl FeeProfile {
    fn observe(&mut self, node: &NodeId, base_fee: f64) {
        let (sum, count) = self.sums.entry(node.clone()).or_insert((0.0, 0));
        *sum += base_fee;
        *count += 1;
    }

    fn into_means(self) -> BTreeMap<NodeId, f64> {
        self.sums
            .into_iter()
            .map(|(node, (sum, count))| (node, sum / f64::from(count)))
            .collect()
    }
}
