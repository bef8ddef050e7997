use thiserror::Error;

#[derive(Debug, Error)]
pub enum HyperJsonError {
    #[error("hyperedge {index} has no members")]
    EmptyHyperedge { index: usize },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
