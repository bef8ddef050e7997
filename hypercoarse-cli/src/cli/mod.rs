//! Command-line interface orchestration for hypercoarse.
//!
//! Each coarsening command reads an edge table, runs one strategy, writes the
//! hyperjson envelope, and optionally projects the result onto a pairwise
//! edge table. The `project` command converts an existing envelope.

mod commands;

pub use commands::{
    CapacityArg, Cli, CliError, CoarsenArgs, Command, ExecutionSummary, FhsCommand,
    InconclusiveArg, NchCommand, ProjectCommand, SupernodeCommand, render_summary, run_cli,
};

#[cfg(test)]
mod tests;
