use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use netlab::config::RoutingProtocol;
use netlab::config_loader::{self, CliOverrides};
use netlab::orchestrator;
use std::fs;
use std::path::PathBuf;

/// Compile a network topology into a Netkit lab
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the lab description YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Lab root directory to generate
    #[arg(short, long, default_value = "lab")]
    output: PathBuf,

    /// GML topology to use instead of the one named in the config
    #[arg(short, long)]
    topology: Option<PathBuf>,

    /// Routing protocol to run (ospf, ripng, bgp); makes it a routing lab
    #[arg(short, long)]
    protocol: Option<RoutingProtocol>,

    /// Remove an existing output directory first
    #[arg(short, long)]
    force: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Configuration file: {:?}", args.config);
    info!("Output directory: {:?}", args.output);

    let mut config = config_loader::load_config(&args.config)?;
    config_loader::apply_overrides(
        &mut config,
        &CliOverrides {
            topology: args.topology.clone(),
            protocol: args.protocol,
        },
    )?;

    if args.output.exists() {
        if args.force {
            info!("Removing previous lab at {:?}", args.output);
            fs::remove_dir_all(&args.output).wrap_err_with(|| {
                format!("Failed to remove output directory '{}'", args.output.display())
            })?;
        } else {
            warn!(
                "Output directory {:?} already exists; files will be overwritten (use --force to start clean)",
                args.output
            );
        }
    }

    let report = orchestrator::generate_lab(&config, &args.output)?;

    let warnings = report.warnings().count();
    if warnings > 0 {
        warn!(
            "Lab generated with {} warning(s); affected entities may not start properly",
            warnings
        );
    }
    info!("Ready to start with: lstart -d {:?}", args.output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["netlabc", "--config", "lab.yaml"]);

        assert_eq!(args.config, PathBuf::from("lab.yaml"));
        assert_eq!(args.output, PathBuf::from("lab"));
        assert!(args.topology.is_none());
        assert!(args.protocol.is_none());
        assert!(!args.force);
    }

    #[test]
    fn test_override_args() {
        let args = Args::parse_from([
            "netlabc",
            "-c",
            "lab.yaml",
            "-o",
            "out",
            "--topology",
            "core.gml",
            "--protocol",
            "ospfv3",
            "--force",
        ]);

        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.topology, Some(PathBuf::from("core.gml")));
        assert_eq!(args.protocol, Some(RoutingProtocol::Ospf));
        assert!(args.force);
    }

    #[test]
    fn test_unknown_protocol_is_rejected() {
        assert!(Args::try_parse_from(["netlabc", "-c", "lab.yaml", "-p", "isis"]).is_err());
    }
}
