//! Routing identity allocation.
//!
//! Router IDs and AS numbers are handed out from monotonically advancing
//! counters. The router ID counter is the dotted quad read as a base-256
//! number: `0.0.0.255` is followed by `0.0.1.0`.

use crate::error::AllocationError;
use serde::Serialize;
use std::net::Ipv4Addr;

/// AS number and router ID of one router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RouterIdentity {
    pub as_number: u32,
    pub router_id: Ipv4Addr,
}

/// Counters for router IDs and AS numbers, shared by every router of a lab
#[derive(Debug)]
pub struct AddressAllocator {
    /// `None` once `u32::MAX` has been handed out
    next_as: Option<u32>,
    /// `None` once `255.255.255.255` has been handed out
    next_router_id: Option<u32>,
}

impl AddressAllocator {
    /// First AS number is 1 and first router ID is `0.0.0.1`
    pub fn new() -> Self {
        Self::starting_at(1, Ipv4Addr::new(0, 0, 0, 1))
    }

    /// Start both counters at arbitrary values
    pub fn starting_at(as_number: u32, router_id: Ipv4Addr) -> Self {
        AddressAllocator {
            next_as: Some(as_number),
            next_router_id: Some(u32::from(router_id)),
        }
    }

    /// Return the current AS number and advance the counter by one
    pub fn next_as_number(&mut self) -> Result<u32, AllocationError> {
        let current = self.next_as.ok_or(AllocationError::AsNumbersExhausted)?;
        self.next_as = current.checked_add(1);
        Ok(current)
    }

    /// Return the current router ID and advance it to its successor
    pub fn next_router_id(&mut self) -> Result<Ipv4Addr, AllocationError> {
        let current = self
            .next_router_id
            .ok_or(AllocationError::RouterIdsExhausted)?;
        // Carrying out of the most significant octet has no successor
        self.next_router_id = current.checked_add(1);
        Ok(Ipv4Addr::from(current))
    }

    /// Allocate a complete identity for one router
    pub fn next_identity(&mut self) -> Result<RouterIdentity, AllocationError> {
        let router_id = self.next_router_id()?;
        let as_number = self.next_as_number()?;
        log::debug!("Allocated router-id {} and AS {}", router_id, as_number);
        Ok(RouterIdentity {
            as_number,
            router_id,
        })
    }
}

impl Default for AddressAllocator {
    fn default() -> Self {
        Self::new()
    }
}
