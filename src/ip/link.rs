//! Per-link IPv6 addressing.
//!
//! Every link takes the next /64 out of the lab's pool. The first endpoint
//! of the edge gets host `::1`, the second gets `::2`.

use crate::error::AllocationError;
use ipnet::{Ipv6Net, Ipv6Subnets};
use std::net::Ipv6Addr;

/// Prefix length written next to every interface address
pub const LINK_PREFIX_LEN: u8 = 64;

/// Subnet and endpoint addresses of one link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkAddresses {
    pub subnet: Ipv6Net,
    pub first: Ipv6Addr,
    pub second: Ipv6Addr,
}

/// Pool of /64 link subnets
#[derive(Debug)]
pub struct LinkPrefixPool {
    pool: Ipv6Net,
    subnets: Ipv6Subnets,
}

impl LinkPrefixPool {
    /// Fails when `pool` is longer than /64 and therefore holds no link subnet
    pub fn new(pool: Ipv6Net) -> Result<Self, AllocationError> {
        let subnets = pool
            .trunc()
            .subnets(LINK_PREFIX_LEN)
            .map_err(|_| AllocationError::LinkPrefixesExhausted(pool))?;
        Ok(LinkPrefixPool { pool, subnets })
    }

    pub fn next_link(&mut self) -> Result<LinkAddresses, AllocationError> {
        let subnet = self
            .subnets
            .next()
            .ok_or(AllocationError::LinkPrefixesExhausted(self.pool))?;
        let base = u128::from(subnet.network());
        Ok(LinkAddresses {
            subnet,
            first: Ipv6Addr::from(base + 1),
            second: Ipv6Addr::from(base + 2),
        })
    }
}
