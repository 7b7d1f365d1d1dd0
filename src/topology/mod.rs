//! Network topology module.
//!
//! This module holds the in-memory graph a lab is compiled from, the binder
//! that turns its edges into numbered interfaces, zones and addresses, and
//! the per-link shaping provider used by bring-up files.

pub mod binder;
pub mod shaping;
pub mod types;

// Re-export key types for easier access
pub use binder::{BoundLink, TopologyBinder};
pub use shaping::{EdgeShaper, LinkShaper, LinkShaping, NoShaping};
pub use types::{GraphSource, Topology, TopologyEdge};
