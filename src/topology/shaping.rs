//! Per-link bandwidth and delay.
//!
//! Bring-up files append one `tc` line per shaped interface. The values come
//! from a [`LinkShaper`]; the default one, [`EdgeShaper`], reads them off the
//! graph edges and falls back to lab-wide defaults.

use crate::ip::ZoneId;
use crate::topology::binder::BoundLink;
use crate::topology::types::TopologyEdge;
use crate::utils::bandwidth::Bandwidth;
use std::collections::HashMap;
use std::time::Duration;

/// Bandwidth and delay of one link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkShaping {
    pub bandwidth: Option<Bandwidth>,
    pub delay: Option<Duration>,
}

impl LinkShaping {
    pub fn is_empty(&self) -> bool {
        self.bandwidth.is_none() && self.delay.is_none()
    }

    /// Fill the unset fields of `self` from `defaults`
    pub fn or(self, defaults: &LinkShaping) -> LinkShaping {
        LinkShaping {
            bandwidth: self.bandwidth.or(defaults.bandwidth),
            delay: self.delay.or(defaults.delay),
        }
    }
}

/// Source of bandwidth and delay values, keyed by zone
pub trait LinkShaper: Sync {
    fn shaping(&self, zone: &ZoneId) -> Option<LinkShaping>;
}

/// Leaves every link unshaped
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShaping;

impl LinkShaper for NoShaping {
    fn shaping(&self, _zone: &ZoneId) -> Option<LinkShaping> {
        None
    }
}

/// Shaping taken from edge attributes, with lab-wide fallbacks
#[derive(Debug, Default, Clone)]
pub struct EdgeShaper {
    by_zone: HashMap<ZoneId, LinkShaping>,
}

impl EdgeShaper {
    pub fn new(links: &[BoundLink], edges: &[TopologyEdge], defaults: &LinkShaping) -> Self {
        let by_zone = links
            .iter()
            .filter_map(|link| {
                let edge = edges.get(link.edge)?;
                let shaping = LinkShaping {
                    bandwidth: edge.bandwidth,
                    delay: edge.delay,
                }
                .or(defaults);
                (!shaping.is_empty()).then(|| (link.zone.clone(), shaping))
            })
            .collect();
        EdgeShaper { by_zone }
    }
}

impl LinkShaper for EdgeShaper {
    fn shaping(&self, zone: &ZoneId) -> Option<LinkShaping> {
        self.by_zone.get(zone).copied()
    }
}
