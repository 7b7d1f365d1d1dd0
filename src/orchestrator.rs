//! Lab orchestrator.
//!
//! This module drives one compilation run from a graph to a lab directory:
//!
//! 1. one entity per graph node (all switches or all routers)
//! 2. topology binding (interfaces, zones, addresses)
//! 3. routing identities, allocated sequentially in creation order
//! 4. per-entity files, written in parallel
//! 5. `lab.conf` and the `lab.json` report
//!
//! Nothing touches the filesystem before step 4, so a broken graph leaves no
//! output behind.

use crate::config::{LabConfig, LabType, ValidationError};
use crate::entity::router::emit_router;
use crate::entity::switch::emit_switch;
use crate::entity::{EntityId, Lab, NetworkEntity};
use crate::error::LabError;
use crate::gml_parser;
use crate::ip::AddressAllocator;
use crate::netkit::{render_lab_conf, write_file, LabDescriptor, LAB_CONF, LAB_REPORT};
use crate::report::{EntityReport, LabReport};
use crate::topology::{BoundLink, EdgeShaper, GraphSource, LinkShaping, TopologyBinder};
use crate::utils::bandwidth::parse_bandwidth;
use color_eyre::eyre::WrapErr;
use ipnet::Ipv6Net;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Compiles graphs into Netkit labs
///
/// Holds only run settings; every call to [`LabAssembler::assemble`] starts
/// from fresh allocators.
#[derive(Debug, Clone)]
pub struct LabAssembler {
    lab_type: LabType,
    link_prefix: Ipv6Net,
    shaping: LinkShaping,
    descriptor: LabDescriptor,
}

impl LabAssembler {
    pub fn new(lab_type: LabType) -> Self {
        LabAssembler {
            lab_type,
            link_prefix: crate::config::default_link_prefix(),
            shaping: LinkShaping::default(),
            descriptor: LabDescriptor::default(),
        }
    }

    pub fn from_config(config: &LabConfig) -> Result<Self, LabError> {
        let bandwidth = config
            .links
            .bandwidth
            .as_deref()
            .map(parse_bandwidth)
            .transpose()
            .map_err(ValidationError::InvalidLinks)?;

        Ok(LabAssembler::new(config.lab_type()?)
            .with_link_prefix(config.addressing.link_prefix)
            .with_shaping_defaults(LinkShaping {
                bandwidth,
                delay: config.links.delay,
            })
            .with_descriptor(LabDescriptor {
                description: config.lab.description.clone(),
                version: config.lab.version.clone(),
                author: config.lab.author.clone(),
            }))
    }

    pub fn with_link_prefix(mut self, link_prefix: Ipv6Net) -> Self {
        self.link_prefix = link_prefix;
        self
    }

    /// Shaping for links whose edge carries no bandwidth or delay
    pub fn with_shaping_defaults(mut self, shaping: LinkShaping) -> Self {
        self.shaping = shaping;
        self
    }

    pub fn with_descriptor(mut self, descriptor: LabDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn lab_type(&self) -> LabType {
        self.lab_type
    }

    fn entity(&self, name: &str) -> NetworkEntity {
        match self.lab_type {
            LabType::Switching => NetworkEntity::switch(name),
            LabType::Routing(_) => NetworkEntity::router(name),
        }
    }

    /// Create and bind every entity, without writing anything
    pub fn build(&self, source: &dyn GraphSource) -> Result<(Lab, Vec<BoundLink>), LabError> {
        let mut lab = Lab::new();
        for name in source.node_names() {
            lab.add_entity(self.entity(name))?;
        }
        debug!("Created {} entities", lab.len());

        let links = TopologyBinder::new(self.link_prefix)?.bind(&mut lab, source.edges())?;

        if matches!(self.lab_type, LabType::Routing(_)) {
            lab.assign_identities(&mut AddressAllocator::new())?;
            debug!("Assigned routing identities to {} routers", lab.len());
        }

        Ok((lab, links))
    }

    /// Compile `source` into a lab rooted at `root`
    pub fn assemble(&self, source: &dyn GraphSource, root: &Path) -> Result<LabReport, LabError> {
        let (lab, links) = self.build(source)?;

        fs::create_dir_all(root).map_err(|source| LabError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let shaper = EdgeShaper::new(&links, source.edges(), &self.shaping);
        let ids: Vec<EntityId> = lab.ids().collect();

        // Rendering is read-only from here on
        let entities = ids
            .par_iter()
            .map(|&id| -> Result<EntityReport, LabError> {
                match self.lab_type {
                    LabType::Switching => emit_switch(&lab, id, &shaper, root),
                    LabType::Routing(protocol) => emit_router(&lab, id, protocol, &shaper, root),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        write_file(&root.join(LAB_CONF), &render_lab_conf(&lab, &self.descriptor))?;

        let report = LabReport {
            lab: self.lab_type,
            entities,
        };
        report.write_json(&root.join(LAB_REPORT))?;

        let warnings = report.warnings().count();
        info!(
            "Generated {} entities and {} links in {:?} ({} ok, {} with warnings)",
            lab.len(),
            links.len(),
            root,
            report.succeeded().count(),
            warnings
        );
        for entity in report.warnings() {
            if let crate::report::EntityStatus::Warning(message) = &entity.status {
                warn!("  - {}: {}", entity.name, message);
            }
        }

        Ok(report)
    }
}

/// Load the configured GML topology and compile it into `output`
pub fn generate_lab(config: &LabConfig, output: &Path) -> color_eyre::Result<LabReport> {
    let topology_path = Path::new(&config.topology.path);
    let topology = gml_parser::parse_gml_file(topology_path)?
        .to_topology()
        .wrap_err_with(|| format!("Invalid topology in {:?}", topology_path))?;

    let assembler = LabAssembler::from_config(config)?;
    info!("Compiling {:?} lab into {:?}", assembler.lab_type(), output);

    let report = assembler
        .assemble(&topology, output)
        .wrap_err("Lab generation failed")?;
    Ok(report)
}
