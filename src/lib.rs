//! # Netlab - Topology compiler for Netkit labs
//!
//! This library turns a network graph into a ready-to-start Netkit lab: one
//! directory and bring-up file per node, Quagga routing configuration for
//! routers, and the `lab.conf` that wires interfaces into collision domains.
//!
//! ## Overview
//!
//! A lab is either a **switching** lab (every node is a switch; spanning tree
//! comes from the emulator image) or a **routing** lab where every node is a
//! router running one protocol:
//!
//! - **OSPFv3** (`ospf6d`): per-interface costs from edge weights, one area
//! - **RIPng** (`ripngd`): advertises `::/0`
//! - **BGP** (`bgpd`): one AS per router, one eBGP session per link
//!
//! Every link gets its own collision domain (`A0`, `A1`, ...) and IPv6 /64.
//! Edges may carry bandwidth and delay, which end up as `tc netem` lines.
//!
//! ## Architecture
//!
//! - `config`: typed lab description and validation
//! - `config_loader`: YAML loading and command-line overrides
//! - `gml_parser`: GML graph reader
//! - `topology`: in-memory graph, edge binding, link shaping
//! - `ip`: router ID, AS, zone and link prefix allocation
//! - `entity`: switches and routers, and the files they emit
//! - `netkit`: lab directory layout and `lab.conf`
//! - `report`: per-entity run report (`lab.json`)
//! - `orchestrator`: runs the whole pipeline
//! - `utils`: bandwidth and delay parsing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use netlab::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("lab.yaml"))?;
//! let report = orchestrator::generate_lab(&config, Path::new("lab"))?;
//! println!("{} entities generated", report.entities.len());
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```
//!
//! Building a topology in code works the same way:
//!
//! ```rust,no_run
//! use netlab::config::{LabType, RoutingProtocol};
//! use netlab::orchestrator::LabAssembler;
//! use netlab::topology::{Topology, TopologyEdge};
//! use std::path::Path;
//!
//! let mut topology = Topology::new();
//! topology
//!     .add_node("R1")
//!     .add_node("R2")
//!     .add_edge(TopologyEdge::new("R1", "R2").with_weight(10));
//!
//! LabAssembler::new(LabType::Routing(RoutingProtocol::Ospf))
//!     .assemble(&topology, Path::new("ospf-lab"))?;
//! # Ok::<(), netlab::error::LabError>(())
//! ```
//!
//! ## Error Handling
//!
//! Library code returns `thiserror` enums (see [`error`]); a graph naming an
//! unknown node or an exhausted identifier space stops the run before any
//! file is written. A directory that cannot be set up only produces a
//! per-entity warning in the report. The binary reports errors through
//! `color_eyre`.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod gml_parser;

pub mod entity;
pub mod ip;
pub mod netkit;
pub mod orchestrator;
pub mod report;
pub mod topology;
pub mod utils;
