use crate::utils::bandwidth::parse_bandwidth;
use ipnet::Ipv6Net;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Routing daemon a routing lab runs on every router
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProtocol {
    /// OSPFv3 via ospf6d, single backbone area
    Ospf,
    /// RIPng via ripngd, advertising the default route
    Ripng,
    /// BGP via bgpd, one AS per router
    Bgp,
}

impl RoutingProtocol {
    /// Quagga daemon name for this protocol
    pub fn daemon(&self) -> &'static str {
        match self {
            RoutingProtocol::Ospf => "ospf6d",
            RoutingProtocol::Ripng => "ripngd",
            RoutingProtocol::Bgp => "bgpd",
        }
    }
}

impl fmt::Display for RoutingProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingProtocol::Ospf => write!(f, "ospf"),
            RoutingProtocol::Ripng => write!(f, "ripng"),
            RoutingProtocol::Bgp => write!(f, "bgp"),
        }
    }
}

impl std::str::FromStr for RoutingProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ospf" | "ospf6" | "ospfv3" => Ok(RoutingProtocol::Ospf),
            "ripng" => Ok(RoutingProtocol::Ripng),
            "bgp" => Ok(RoutingProtocol::Bgp),
            other => Err(format!("Unknown routing protocol '{}'", other)),
        }
    }
}

/// Kind of nodes a lab is built from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LabKind {
    /// Every node is a spanning-tree capable switch
    Switching,
    /// Every node is a router running one routing protocol
    Routing,
}

/// Lab kind and protocol resolved into a single value
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "kind", content = "protocol")]
pub enum LabType {
    Switching,
    Routing(RoutingProtocol),
}

/// Top-level lab description, mirroring the YAML file
#[derive(Debug, Serialize, Deserialize)]
pub struct LabConfig {
    pub lab: LabSection,
    pub topology: TopologySection,
    #[serde(default)]
    pub addressing: AddressingSection,
    #[serde(default)]
    pub links: LinkDefaults,
}

/// Lab metadata and kind
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LabSection {
    pub kind: LabKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<RoutingProtocol>,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Where the graph comes from
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TopologySection {
    pub path: String,
}

/// Address pool carved into one /64 per link
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddressingSection {
    pub link_prefix: Ipv6Net,
}

/// Shaping applied to links whose edge carries no value of its own
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LinkDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<String>,
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub delay: Option<Duration>,
}

fn default_description() -> String {
    "Generated Netkit lab".to_string()
}

impl Default for AddressingSection {
    fn default() -> Self {
        Self {
            link_prefix: default_link_prefix(),
        }
    }
}

/// Documentation prefix used when the lab description names none
pub fn default_link_prefix() -> Ipv6Net {
    Ipv6Net::new(std::net::Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0), 48)
        .expect("/48 is a valid IPv6 prefix length")
}

impl LabConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.lab_type()?;

        let metadata = [
            ("description", Some(&self.lab.description)),
            ("author", self.lab.author.as_ref()),
            ("version", self.lab.version.as_ref()),
        ];
        for (field, value) in metadata {
            if let Some(value) = value.filter(|v| v.contains(['"', '\n', '\r'])) {
                return Err(ValidationError::InvalidLab(format!(
                    "{} '{}' cannot contain double quotes or line breaks",
                    field,
                    value.escape_default()
                )));
            }
        }

        if self.topology.path.trim().is_empty() {
            return Err(ValidationError::InvalidTopology(
                "topology path cannot be empty".to_string(),
            ));
        }

        if self.addressing.link_prefix.prefix_len() > 64 {
            return Err(ValidationError::InvalidAddressing(format!(
                "link prefix {} is longer than /64, no /64 link subnets fit",
                self.addressing.link_prefix
            )));
        }

        if let Some(bandwidth) = &self.links.bandwidth {
            parse_bandwidth(bandwidth).map_err(ValidationError::InvalidLinks)?;
        }

        Ok(())
    }

    /// Resolve kind and protocol, rejecting combinations that make no sense
    pub fn lab_type(&self) -> Result<LabType, ValidationError> {
        match (self.lab.kind, self.lab.protocol) {
            (LabKind::Switching, None) => Ok(LabType::Switching),
            (LabKind::Switching, Some(protocol)) => Err(ValidationError::InvalidLab(format!(
                "switching labs run no routing protocol, but '{}' was requested",
                protocol
            ))),
            (LabKind::Routing, Some(protocol)) => Ok(LabType::Routing(protocol)),
            (LabKind::Routing, None) => Err(ValidationError::InvalidLab(
                "routing labs must name a protocol (ospf, ripng or bgp)".to_string(),
            )),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid lab configuration: {0}")]
    InvalidLab(String),
    #[error("Invalid topology configuration: {0}")]
    InvalidTopology(String),
    #[error("Invalid addressing configuration: {0}")]
    InvalidAddressing(String),
    #[error("Invalid link configuration: {0}")]
    InvalidLinks(String),
}
