//! Topology type definitions.
//!
//! The compiler only needs node names and an ordered list of edges from
//! whatever produced the graph; [`GraphSource`] is that contract.

use crate::utils::bandwidth::Bandwidth;
use std::time::Duration;

/// Read access to a loaded graph
///
/// `edges()` must yield edges in the same order on every call: interface
/// numbers are assigned purely by arrival order.
pub trait GraphSource {
    fn node_names(&self) -> Vec<&str>;
    fn edges(&self) -> &[TopologyEdge];
}

/// An undirected link between two named nodes
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyEdge {
    pub a: String,
    pub b: String,
    /// Routing metric (OSPF cost)
    pub weight: Option<u32>,
    pub bandwidth: Option<Bandwidth>,
    pub delay: Option<Duration>,
}

impl TopologyEdge {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            weight: None,
            bandwidth: None,
            delay: None,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.bandwidth = Some(bandwidth);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// In-memory graph with insertion-ordered nodes and edges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    nodes: Vec<String>,
    edges: Vec<TopologyEdge>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>) -> &mut Self {
        self.nodes.push(name.into());
        self
    }

    pub fn add_edge(&mut self, edge: TopologyEdge) -> &mut Self {
        self.edges.push(edge);
        self
    }
}

impl GraphSource for Topology {
    fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(String::as_str).collect()
    }

    fn edges(&self) -> &[TopologyEdge] {
        &self.edges
    }
}
