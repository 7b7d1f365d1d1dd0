//! Shared utilities: link bandwidth and delay parsing.

pub mod bandwidth;
pub mod duration;

pub use bandwidth::{parse_bandwidth, Bandwidth};
pub use duration::{format_delay, parse_delay};
