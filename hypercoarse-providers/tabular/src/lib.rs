//! Delimited edge-table ingestion and pairwise edge export.

mod columns;
mod errors;
mod reader;
mod writer;

pub use columns::ColumnLayout;
pub use errors::TabularError;
pub use reader::{EdgeTable, EdgeTableOptions, EdgeTableReader};
pub use writer::{PAIRWISE_HEADER, write_pairwise_edges, write_pairwise_edges_path};

#[cfg(test)]
mod tests;
