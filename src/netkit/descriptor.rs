//! Lab-wide descriptor (`lab.conf`).
//!
//! Besides the metadata header, `lab.conf` is what actually wires the lab:
//! each `<name>[<iface>]=<zone>` line plugs one interface into a collision
//! domain.

use crate::entity::Lab;

/// Metadata written at the top of `lab.conf`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabDescriptor {
    pub description: String,
    pub version: Option<String>,
    pub author: Option<String>,
}

impl Default for LabDescriptor {
    fn default() -> Self {
        LabDescriptor {
            description: "Generated Netkit lab".to_string(),
            version: None,
            author: None,
        }
    }
}

/// Entities in creation order, interfaces ascending
pub fn render_lab_conf(lab: &Lab, descriptor: &LabDescriptor) -> String {
    let mut conf = format!("LAB_DESCRIPTION=\"{}\"\n", descriptor.description);
    if let Some(version) = &descriptor.version {
        conf.push_str(&format!("LAB_VERSION={}\n", version));
    }
    if let Some(author) = &descriptor.author {
        conf.push_str(&format!("LAB_AUTHOR=\"{}\"\n", author));
    }
    conf.push('\n');

    for entity in lab.entities() {
        for iface in entity.interfaces() {
            conf.push_str(&format!("{}[{}]={}\n", entity.name(), iface.index, iface.zone));
        }
    }

    conf
}
