//! Switch emission.
//!
//! Spanning tree is provided by the emulator's switch image; a switch only
//! needs its interfaces brought up and its links shaped.

use crate::entity::startup::render_startup;
use crate::entity::{EntityId, Lab};
use crate::error::LabError;
use crate::netkit::{entity_dir, prepare_dir, startup_path, write_file};
use crate::report::{EntityReport, EntityStatus};
use crate::topology::shaping::LinkShaper;
use std::path::Path;

/// Write the entity directory and `<name>.startup` for one switch
pub fn emit_switch(
    lab: &Lab,
    id: EntityId,
    shaper: &dyn LinkShaper,
    root: &Path,
) -> Result<EntityReport, LabError> {
    let switch = lab.entity(id);
    let name = switch.name();

    let status = match prepare_dir(&entity_dir(root, name)) {
        Ok(()) => EntityStatus::Ok,
        Err(message) => {
            log::warn!("{}: {}", name, message);
            EntityStatus::Warning(message)
        }
    };

    write_file(&startup_path(root, name), &render_startup(switch, shaper))?;
    log::debug!("Wrote startup file for switch {}", name);

    Ok(EntityReport::describe(
        lab,
        id,
        vec![format!("{}.startup", name)],
        status,
    ))
}
