//! Error taxonomy for lab compilation.
//!
//! Structural problems (a broken graph, an exhausted identifier space) are
//! errors and stop the run. Problems setting up a single entity's directory
//! are not errors at all: they are reported per entity, see
//! [`crate::report::EntityStatus`].

use crate::config::ValidationError;
use ipnet::Ipv6Net;
use std::path::PathBuf;

/// The graph handed to the compiler is not a valid lab topology.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Edge {from} -- {to} references unknown node '{missing}'")]
    UnknownNode {
        from: String,
        to: String,
        missing: String,
    },
    #[error("Edge references non-existent GML node id {0}")]
    UnknownNodeId(u32),
    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),
    #[error("Invalid '{key}' value '{value}' on edge {from} -- {to}: {reason}")]
    InvalidEdgeAttribute {
        from: String,
        to: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// An identifier space ran out. Never clamped or wrapped, since reusing an
/// identifier would break uniqueness within the lab.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("Router ID space exhausted: 255.255.255.255 has already been handed out")]
    RouterIdsExhausted,
    #[error("AS number space exhausted")]
    AsNumbersExhausted,
    #[error("Zone identifiers exhausted (A0 through Z99 are in use)")]
    ZonesExhausted,
    #[error("Link prefix pool {0} has no /64 left")]
    LinkPrefixesExhausted(Ipv6Net),
}

/// Anything that aborts a lab compilation.
#[derive(Debug, thiserror::Error)]
pub enum LabError {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Config(#[from] ValidationError),
    #[error("Router {0} has no routing identity assigned")]
    IdentityMissing(String),
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize lab report: {0}")]
    Report(#[from] serde_json::Error),
}
