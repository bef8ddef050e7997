use hypercoarse_core::{CoarsenError, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("edge table has {columns} columns and no recognised endpoint pair")]
    MissingEndpointColumns { columns: usize },
    #[error("line {line}: empty endpoint in column `{column}`")]
    EmptyEndpoint { line: u64, column: String },
    #[error("line {line}: self-loop on node {node}")]
    SelfLoop { line: u64, node: NodeId },
    #[error("line {line}: column `{column}` holds `{value}`, which is not a number")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },
    #[error("graph rejected edge table: {0}")]
    Graph(#[from] CoarsenError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
