//! # Run report
//!
//! After a lab is generated, a JSON summary is written next to `lab.conf`
//! (`lab.json`). It lists every entity with its interfaces, addresses and
//! routing identity, plus whether the entity's files were all written or
//! its directory setup hit a problem.
//!
//! ```json
//! {
//!   "lab": { "kind": "routing", "protocol": "ospf" },
//!   "entities": [
//!     {
//!       "name": "R1",
//!       "role": "router",
//!       "router_id": "0.0.0.1",
//!       "as_number": 1,
//!       "interfaces": [
//!         { "index": 0, "zone": "A0", "neighbor": "R2",
//!           "address": "2001:db8::1", "weight": 10 }
//!       ],
//!       "files": ["R1.startup", "R1/etc/quagga/daemons"],
//!       "status": { "state": "ok" }
//!     }
//!   ]
//! }
//! ```

use crate::config::LabType;
use crate::entity::{EntityId, Lab};
use crate::error::LabError;
use crate::netkit::write_file;
use serde::Serialize;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

/// Outcome of emitting one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum EntityStatus {
    Ok,
    /// Some files could not be written because directory setup failed
    Warning(String),
}

impl EntityStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, EntityStatus::Ok)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceReport {
    pub index: usize,
    pub zone: String,
    pub neighbor: String,
    /// Switch ports carry no address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Ipv6Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    pub name: String,
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router_id: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_number: Option<u32>,
    pub interfaces: Vec<InterfaceReport>,
    /// Paths relative to the lab root
    pub files: Vec<String>,
    pub status: EntityStatus,
}

impl EntityReport {
    /// Snapshot of an entity's bound state
    pub fn describe(lab: &Lab, id: EntityId, files: Vec<String>, status: EntityStatus) -> Self {
        let entity = lab.entity(id);
        let identity = entity.router_identity();
        EntityReport {
            name: entity.name().to_string(),
            role: if entity.is_router() { "router" } else { "switch" },
            router_id: identity.map(|i| i.router_id),
            as_number: identity.map(|i| i.as_number),
            interfaces: entity
                .interfaces()
                .iter()
                .map(|iface| InterfaceReport {
                    index: iface.index,
                    zone: iface.zone.to_string(),
                    neighbor: lab.entity(iface.neighbor).name().to_string(),
                    address: entity.is_router().then_some(iface.address),
                    weight: iface.weight,
                })
                .collect(),
            files,
            status,
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct LabReport {
    pub lab: LabType,
    pub entities: Vec<EntityReport>,
}

impl LabReport {
    /// Entities whose files were all written
    pub fn succeeded(&self) -> impl Iterator<Item = &EntityReport> {
        self.entities.iter().filter(|e| e.status.is_ok())
    }

    /// Entities that hit a directory setup problem
    pub fn warnings(&self) -> impl Iterator<Item = &EntityReport> {
        self.entities.iter().filter(|e| !e.status.is_ok())
    }

    pub fn entity(&self, name: &str) -> Option<&EntityReport> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), LabError> {
        let json = serde_json::to_string_pretty(self)?;
        write_file(path, &format!("{}\n", json))
    }
}
