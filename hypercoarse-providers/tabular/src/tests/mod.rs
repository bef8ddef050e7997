pub(crate) use super::{ColumnLayout, EdgeTableOptions, EdgeTableReader, TabularError};

mod reader;
