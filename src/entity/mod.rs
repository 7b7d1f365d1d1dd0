//! # Lab entities
//!
//! Every graph node becomes one [`NetworkEntity`]: a switch or a router. All
//! entities of a lab live in a [`Lab`] arena and refer to each other by
//! [`EntityId`], so the neighbor relation can be cyclic without any entity
//! owning another.
//!
//! ## Interface state
//!
//! Interfaces are stored densely: the interface at position `i` of
//! [`NetworkEntity::interfaces`] has index `i` (`eth<i>` inside the emulator).
//! Each interface records
//!
//! - the zone (collision domain) it is plugged into,
//! - the neighbor entity on the other end,
//! - the neighbor's interface index on the same link,
//! - an optional routing metric,
//! - its IPv6 address.
//!
//! All of it is written once by the [`crate::topology::TopologyBinder`] and
//! read-only afterwards.
//!
//! ## Emission
//!
//! - `switch.rs`: bring-up file only
//! - `router.rs`: bring-up file plus Quagga daemon configuration
//! - `startup.rs`: the bring-up text shared by both

pub mod router;
pub mod startup;
pub mod switch;

use crate::error::{AllocationError, TopologyError};
use crate::ip::{AddressAllocator, RouterIdentity, ZoneId};
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv6Addr;

/// Position of an entity inside its [`Lab`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(usize);

impl EntityId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One bound interface
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub index: usize,
    pub zone: ZoneId,
    pub neighbor: EntityId,
    /// Index of the interface on `neighbor` that sits on the same link
    pub peer_interface: usize,
    pub weight: Option<u32>,
    pub address: Ipv6Addr,
}

impl Interface {
    /// Device name inside the emulator
    pub fn device(&self) -> String {
        format!("eth{}", self.index)
    }
}

/// What kind of node an entity is, fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Switch,
    /// Identity is assigned on first protocol emission and cached
    Router { identity: Option<RouterIdentity> },
}

/// A single node of the generated lab
#[derive(Debug, Clone)]
pub struct NetworkEntity {
    name: String,
    role: Role,
    interfaces: Vec<Interface>,
}

impl NetworkEntity {
    pub fn switch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Role::Switch,
            interfaces: Vec::new(),
        }
    }

    pub fn router(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Role::Router { identity: None },
            interfaces: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_router(&self) -> bool {
        matches!(self.role, Role::Router { .. })
    }

    /// Interfaces in ascending index order
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn interface(&self, index: usize) -> Option<&Interface> {
        self.interfaces.get(index)
    }

    /// Index the next bound interface will get
    pub fn next_interface(&self) -> usize {
        self.interfaces.len()
    }

    /// First interface whose neighbor is `neighbor`
    pub fn interface_towards(&self, neighbor: EntityId) -> Option<&Interface> {
        self.interfaces.iter().find(|iface| iface.neighbor == neighbor)
    }

    /// Interfaces carrying a routing metric, in index order
    pub fn weighted_interfaces(&self) -> impl Iterator<Item = (&Interface, u32)> {
        self.interfaces
            .iter()
            .filter_map(|iface| iface.weight.map(|weight| (iface, weight)))
    }

    pub(crate) fn push_interface(&mut self, interface: Interface) {
        debug_assert_eq!(interface.index, self.interfaces.len());
        self.interfaces.push(interface);
    }

    /// Routing identity, if this is a router that already has one
    pub fn router_identity(&self) -> Option<RouterIdentity> {
        match self.role {
            Role::Router { identity } => identity,
            Role::Switch => None,
        }
    }

    /// Assign the routing identity on first use; later calls return the
    /// cached value without touching the allocator. Switches have none.
    pub fn ensure_identity(
        &mut self,
        allocator: &mut AddressAllocator,
    ) -> Result<Option<RouterIdentity>, AllocationError> {
        match &mut self.role {
            Role::Switch => Ok(None),
            Role::Router {
                identity: Some(identity),
            } => Ok(Some(*identity)),
            Role::Router { identity } => {
                let assigned = allocator.next_identity()?;
                log::debug!(
                    "Router {} gets router-id {} and AS {}",
                    self.name,
                    assigned.router_id,
                    assigned.as_number
                );
                *identity = Some(assigned);
                Ok(Some(assigned))
            }
        }
    }
}

/// Arena holding every entity of one lab, in creation order
#[derive(Debug, Default)]
pub struct Lab {
    entities: Vec<NetworkEntity>,
    by_name: HashMap<String, EntityId>,
}

impl Lab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: NetworkEntity) -> Result<EntityId, TopologyError> {
        if self.by_name.contains_key(entity.name()) {
            return Err(TopologyError::DuplicateNode(entity.name().to_string()));
        }
        let id = EntityId(self.entities.len());
        self.by_name.insert(entity.name().to_string(), id);
        self.entities.push(entity);
        Ok(id)
    }

    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn entity(&self, id: EntityId) -> &NetworkEntity {
        &self.entities[id.0]
    }

    pub fn entity_mut(&mut self, id: EntityId) -> &mut NetworkEntity {
        &mut self.entities[id.0]
    }

    pub fn by_name(&self, name: &str) -> Option<&NetworkEntity> {
        self.id_of(name).map(|id| self.entity(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> {
        (0..self.entities.len()).map(EntityId)
    }

    pub fn entities(&self) -> &[NetworkEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The interface on the far end of the link `interface` sits on
    pub fn peer_of(&self, interface: &Interface) -> Option<&Interface> {
        self.entity(interface.neighbor)
            .interface(interface.peer_interface)
    }

    /// Assign identities to every router, in creation order
    pub fn assign_identities(
        &mut self,
        allocator: &mut AddressAllocator,
    ) -> Result<(), AllocationError> {
        for entity in &mut self.entities {
            entity.ensure_identity(allocator)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut lab = Lab::new();
        lab.add_entity(NetworkEntity::router("R1")).unwrap();
        assert!(matches!(
            lab.add_entity(NetworkEntity::router("R1")),
            Err(TopologyError::DuplicateNode(name)) if name == "R1"
        ));
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let mut lab = Lab::new();
        let a = lab.add_entity(NetworkEntity::switch("S1")).unwrap();
        let b = lab.add_entity(NetworkEntity::switch("S2")).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(lab.id_of("S2"), Some(b));
        assert_eq!(lab.by_name("S1").map(|e| e.name()), Some("S1"));
        assert!(lab.id_of("S3").is_none());
    }

    #[test]
    fn test_identity_is_cached() {
        let mut allocator = AddressAllocator::new();
        let mut router = NetworkEntity::router("R1");
        let first = router.ensure_identity(&mut allocator).unwrap();
        let second = router.ensure_identity(&mut allocator).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.unwrap().router_id, Ipv4Addr::new(0, 0, 0, 1));

        // The allocator was only consulted once
        assert_eq!(allocator.next_as_number().unwrap(), 2);
    }

    #[test]
    fn test_switch_has_no_identity() {
        let mut allocator = AddressAllocator::new();
        let mut switch = NetworkEntity::switch("S1");
        assert_eq!(switch.ensure_identity(&mut allocator).unwrap(), None);
        assert_eq!(allocator.next_as_number().unwrap(), 1);
    }

    #[test]
    fn test_assign_identities_in_creation_order() {
        let mut lab = Lab::new();
        for name in ["R1", "R2", "R3"] {
            lab.add_entity(NetworkEntity::router(name)).unwrap();
        }
        let mut allocator = AddressAllocator::new();
        lab.assign_identities(&mut allocator).unwrap();

        let ids: Vec<u32> = lab
            .entities()
            .iter()
            .map(|e| e.router_identity().unwrap().as_number)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(
            lab.by_name("R3").unwrap().router_identity().unwrap().router_id,
            Ipv4Addr::new(0, 0, 0, 3)
        );
    }
}
