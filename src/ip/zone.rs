//! Zone identifiers.
//!
//! A zone is the Netkit collision domain joining the two interfaces of a
//! link. Names run `A0`..`A99`, `B0`..`B99`, up to `Z99`.

use crate::error::AllocationError;
use serde::Serialize;
use std::fmt;

const ZONES_PER_LETTER: u16 = 100;
const ZONE_CAPACITY: u16 = 26 * ZONES_PER_LETTER;

/// Name of a collision domain shared by exactly two interfaces
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out zone names in a fixed order
#[derive(Debug, Default)]
pub struct ZoneAllocator {
    next: u16,
}

impl ZoneAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_zone(&mut self) -> Result<ZoneId, AllocationError> {
        if self.next >= ZONE_CAPACITY {
            return Err(AllocationError::ZonesExhausted);
        }
        let letter = (b'A' + (self.next / ZONES_PER_LETTER) as u8) as char;
        let zone = ZoneId(format!("{}{}", letter, self.next % ZONES_PER_LETTER));
        self.next += 1;
        Ok(zone)
    }

    /// Number of zones handed out so far
    pub fn allocated(&self) -> usize {
        self.next as usize
    }
}
