//! JSON envelope for hypergraphs and their capacity allocations.
//!
//! The envelope is an object with a `hyperedges` array of member lists and a
//! `node_caps` object keyed by `"node|index"`:
//!
//! ```json
//! {"hyperedges": [[1, 2, 3]], "node_caps": {"1|0": 150.0}}
//! ```

mod document;
mod errors;
mod keys;

pub use document::HyperJsonDocument;
pub use errors::HyperJsonError;
pub use keys::{AllocationKey, parse_key};
