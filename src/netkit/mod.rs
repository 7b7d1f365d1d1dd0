//! # Netkit lab layout
//!
//! Where generated files land inside the lab root, and how they get there:
//!
//! ```text
//! <root>/
//! |-- lab.conf                  # interface-to-zone wiring, lab metadata
//! |-- lab.json                  # run report
//! |-- R1.startup                # bring-up script
//! \-- R1/etc/quagga/            # routers only
//!     |-- daemons
//!     |-- zebra.conf
//!     \-- ospf6d.conf | ripngd.conf | bgpd.conf
//! ```
//!
//! Directory setup is best effort: [`prepare_dir`] reports a failure as a
//! message instead of an error, so one broken entity directory does not stop
//! the rest of the lab. Writing a file into a directory that exists is
//! expected to work, and a failure there is a [`LabError::Io`].

pub mod descriptor;

pub use descriptor::{render_lab_conf, LabDescriptor};

use crate::error::LabError;
use std::fs;
use std::path::{Path, PathBuf};

pub const LAB_CONF: &str = "lab.conf";
pub const LAB_REPORT: &str = "lab.json";
pub const QUAGGA_DIR: &str = "etc/quagga";

/// `<root>/<name>`
pub fn entity_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

/// `<root>/<name>.startup`
pub fn startup_path(root: &Path, name: &str) -> PathBuf {
    root.join(format!("{}.startup", name))
}

/// `<root>/<name>/etc/quagga`
pub fn quagga_dir(root: &Path, name: &str) -> PathBuf {
    entity_dir(root, name).join(QUAGGA_DIR)
}

/// Create `path` and its parents. Only fails if the directory still does
/// not exist afterwards; an already existing directory is fine.
pub fn prepare_dir(path: &Path) -> Result<(), String> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(_) if path.is_dir() => Ok(()),
        Err(e) => Err(format!("Failed to set up directory {:?}: {}", path, e)),
    }
}

/// Write `contents` to `path`, replacing any previous file
pub fn write_file(path: &Path, contents: &str) -> Result<(), LabError> {
    fs::write(path, contents).map_err(|source| LabError::Io {
        path: path.to_path_buf(),
        source,
    })
}
