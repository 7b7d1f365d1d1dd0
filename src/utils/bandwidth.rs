//! Link bandwidth parsing.
//!
//! Bandwidths arrive as strings from GML edge attributes and from the lab
//! description ("100Mbit", "1Gbit", "512kbit", "2.5Gbps"). A bare number is
//! read as Mbit/s, matching how GML topologies usually annotate links.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// A link rate in kbit/s
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Bandwidth {
    kbit: u64,
}

impl Bandwidth {
    pub fn from_kbit(kbit: u64) -> Self {
        Self { kbit }
    }

    pub fn from_mbit(mbit: u64) -> Self {
        Self { kbit: mbit * 1000 }
    }
}

/// Formats in the unit `tc` expects, e.g. `100000kbit`
impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kbit", self.kbit)
    }
}

fn bandwidth_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?i)(\d+(?:\.\d+)?)\s*([kmg]?)(?:bit|bps|b)?(?:/s)?$")
            .expect("Invalid bandwidth regex")
    })
}

/// Parse a bandwidth string into kbit/s
///
/// # Examples
/// ```
/// use netlab::utils::bandwidth::{parse_bandwidth, Bandwidth};
///
/// assert_eq!(parse_bandwidth("100Mbit"), Ok(Bandwidth::from_mbit(100)));
/// assert_eq!(parse_bandwidth("1Gbit"), Ok(Bandwidth::from_mbit(1000)));
/// assert_eq!(parse_bandwidth("512kbit"), Ok(Bandwidth::from_kbit(512)));
/// assert!(parse_bandwidth("fast").is_err());
/// ```
pub fn parse_bandwidth(value: &str) -> Result<Bandwidth, String> {
    let value = value.trim().trim_matches('"');
    let captures = bandwidth_pattern()
        .captures(value)
        .ok_or_else(|| format!("Invalid bandwidth format: {}", value))?;

    let amount: f64 = captures[1]
        .parse()
        .map_err(|_| format!("Invalid bandwidth amount: {}", &captures[1]))?;

    let multiplier = match captures[2].to_lowercase().as_str() {
        "k" => 1.0,
        "g" => 1_000_000.0,
        // Bare numbers and "M" are both Mbit/s
        _ => 1000.0,
    };

    let kbit = (amount * multiplier).round();
    if kbit < 1.0 {
        return Err(format!("Bandwidth must be at least 1kbit: {}", value));
    }

    Ok(Bandwidth::from_kbit(kbit as u64))
}
