//! Topology binding.
//!
//! Walks the edges once, in the order the graph source yields them, and for
//! every edge assigns a fresh interface on each endpoint, a shared zone, a
//! /64 and one host address per endpoint. Interface numbers therefore depend
//! only on edge order.

use crate::entity::{EntityId, Interface, Lab};
use crate::error::{AllocationError, LabError, TopologyError};
use crate::ip::{LinkPrefixPool, ZoneAllocator, ZoneId};
use crate::topology::types::TopologyEdge;
use ipnet::Ipv6Net;

/// Result of binding one edge
#[derive(Debug, Clone, PartialEq)]
pub struct BoundLink {
    /// Position of the edge in the graph source
    pub edge: usize,
    pub zone: ZoneId,
    pub subnet: Ipv6Net,
    /// First endpoint and its interface index
    pub a: (EntityId, usize),
    /// Second endpoint and its interface index
    pub b: (EntityId, usize),
}

/// Owns the zone and link-prefix pools of one compilation run
#[derive(Debug)]
pub struct TopologyBinder {
    zones: ZoneAllocator,
    prefixes: LinkPrefixPool,
}

impl TopologyBinder {
    pub fn new(link_pool: Ipv6Net) -> Result<Self, AllocationError> {
        Ok(TopologyBinder {
            zones: ZoneAllocator::new(),
            prefixes: LinkPrefixPool::new(link_pool)?,
        })
    }

    /// Bind every edge onto the entities of `lab`.
    ///
    /// All endpoint names are resolved before anything is mutated, so an
    /// edge naming an unknown node leaves `lab` untouched.
    pub fn bind(&mut self, lab: &mut Lab, edges: &[TopologyEdge]) -> Result<Vec<BoundLink>, LabError> {
        let endpoints = edges
            .iter()
            .map(|edge| resolve(lab, edge))
            .collect::<Result<Vec<_>, _>>()?;

        let mut links = Vec::with_capacity(edges.len());
        for (position, (edge, (a, b))) in edges.iter().zip(endpoints).enumerate() {
            let zone = self.zones.next_zone()?;
            let addresses = self.prefixes.next_link()?;

            let a_index = lab.entity(a).next_interface();
            // A self-loop takes two consecutive interfaces on the same entity
            let b_index = if a == b { a_index + 1 } else { lab.entity(b).next_interface() };

            lab.entity_mut(a).push_interface(Interface {
                index: a_index,
                zone: zone.clone(),
                neighbor: b,
                peer_interface: b_index,
                weight: edge.weight,
                address: addresses.first,
            });
            lab.entity_mut(b).push_interface(Interface {
                index: b_index,
                zone: zone.clone(),
                neighbor: a,
                peer_interface: a_index,
                weight: edge.weight,
                address: addresses.second,
            });

            log::debug!(
                "Bound {}[{}] -- {}[{}] on zone {} ({})",
                edge.a,
                a_index,
                edge.b,
                b_index,
                zone,
                addresses.subnet
            );

            links.push(BoundLink {
                edge: position,
                zone,
                subnet: addresses.subnet,
                a: (a, a_index),
                b: (b, b_index),
            });
        }

        log::info!(
            "Bound {} links across {} entities",
            links.len(),
            lab.len()
        );
        Ok(links)
    }
}

fn resolve(lab: &Lab, edge: &TopologyEdge) -> Result<(EntityId, EntityId), TopologyError> {
    let lookup = |name: &str| {
        lab.id_of(name).ok_or_else(|| TopologyError::UnknownNode {
            from: edge.a.clone(),
            to: edge.b.clone(),
            missing: name.to_string(),
        })
    };
    Ok((lookup(&edge.a)?, lookup(&edge.b)?))
}
