//! Shared test utilities used across hypercoarse crates.

pub mod ci;
pub mod tracing;
