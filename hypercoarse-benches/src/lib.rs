//! Benchmark support crate for hypercoarse.
//!
//! Provides seeded synthetic graphs and parameter types used by the Criterion
//! benchmarks for the hyperedge strategies and clique projection.

pub mod error;
pub mod graph;
pub mod params;
