//! Identifier and address allocation.
//!
//! Everything in a lab that must be unique lives here: router IDs and AS
//! numbers for routers, zone (collision domain) names for links, and one IPv6
//! /64 per link. Every allocator is a plain value owned by a single
//! compilation run, so two runs never share counters.

pub mod allocator;
pub mod link;
pub mod zone;

// Re-export commonly used types
pub use allocator::{AddressAllocator, RouterIdentity};
pub use link::{LinkAddresses, LinkPrefixPool, LINK_PREFIX_LEN};
pub use zone::{ZoneAllocator, ZoneId};
