use crate::config::{LabConfig, LabKind, RoutingProtocol};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and validate a lab description from a YAML file
pub fn load_config(config_path: &Path) -> Result<LabConfig> {
    info!("Loading lab description from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open lab description {:?}", config_path))?;
    let config: LabConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse lab description {:?}", config_path))?;

    config.validate()?;
    Ok(config)
}

/// Command-line values that take precedence over the YAML file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub topology: Option<PathBuf>,
    pub protocol: Option<RoutingProtocol>,
}

/// Apply CLI overrides and re-validate.
///
/// Naming a protocol turns the lab into a routing lab.
pub fn apply_overrides(config: &mut LabConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(topology) = &overrides.topology {
        info!("Topology overridden on the command line: {:?}", topology);
        config.topology.path = topology.to_string_lossy().into_owned();
    }

    if let Some(protocol) = overrides.protocol {
        info!("Routing protocol overridden on the command line: {}", protocol);
        config.lab.kind = LabKind::Routing;
        config.lab.protocol = Some(protocol);
    }

    config.validate()?;
    Ok(())
}
