//! Developer Tooling: read-only inspectors for simulation and terrain state.
//!
//! # Invariants
//! - Tools never mutate what they inspect.

mod inspector;

pub use inspector::{SimInspector, SimSummary, TerrainSummary};

pub fn crate_info() -> &'static str {
    concat!("hillrun-tools v", env!("CARGO_PKG_VERSION"))
}
