//! Pairwise edge export.
use std::{io::Write, path::Path};

use csv::Writer;
use hypercoarse_core::PairwiseEdge;
use tracing::instrument;

use crate::errors::TabularError;

/// Header row of exported pairwise edge tables.
pub const PAIRWISE_HEADER: [&str; 6] = ["src", "trg", "capacity", "base_fee", "fee_rate", "enabled"];

/// Writes `edges` as CSV with [`PAIRWISE_HEADER`] to `writer`.
///
/// A header is written even when `edges` is empty.
///
/// # Errors
/// Returns [`TabularError::Csv`] or [`TabularError::Io`] when writing fails.
///
/// # Examples
/// ```
/// use hypercoarse_core::{FeeSchedule, NodeId, PairwiseEdge};
/// use hypercoarse_providers_tabular::write_pairwise_edges;
///
/// let fees = FeeSchedule::default();
/// let edge = PairwiseEdge {
///     source: NodeId::from(1),
///     target: NodeId::from(2),
///     capacity: 150.0,
///     base_fee: fees.base_fee,
///     fee_rate: fees.fee_rate,
///     enabled: fees.enabled,
/// };
/// let mut out = Vec::new();
/// write_pairwise_edges(&mut out, &[edge]).expect("in-memory write");
/// let text = String::from_utf8(out).expect("utf-8 output");
/// assert_eq!(text, "src,trg,capacity,base_fee,fee_rate,enabled\n1,2,150,100,1,true\n");
/// ```
pub fn write_pairwise_edges<W: Write>(writer: W, edges: &[PairwiseEdge]) -> Result<(), TabularError> {
    let mut out = Writer::from_writer(writer);
    out.write_record(PAIRWISE_HEADER)?;
    for edge in edges {
        out.write_record([
            edge.source.to_string(),
            edge.target.to_string(),
            edge.capacity.to_string(),
            edge.base_fee.to_string(),
            edge.fee_rate.to_string(),
            edge.enabled.to_string(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Writes `edges` to a new file at `path`, replacing any existing file.
///
/// # Errors
/// As [`write_pairwise_edges`], plus [`TabularError::Io`] when the file
/// cannot be created.
#[instrument(name = "tabular.write", err, skip(path, edges), fields(edges = edges.len()))]
pub fn write_pairwise_edges_path(
    path: impl AsRef<Path>,
    edges: &[PairwiseEdge],
) -> Result<(), TabularError> {
    let file = std::fs::File::create(path)?;
    write_pairwise_edges(file, edges)
}
