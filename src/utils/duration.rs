//! Link delay parsing and formatting.
//!
//! Delays use humantime syntax on input ("5ms", "1s 500ms") and are written
//! out in the unit `netem` expects.

use humantime_serde::re::humantime;
use std::time::Duration;

/// Parse a delay string such as "5ms"
///
/// A bare number is read as milliseconds.
///
/// # Examples
/// ```
/// use netlab::utils::duration::parse_delay;
/// use std::time::Duration;
///
/// assert_eq!(parse_delay("5ms"), Ok(Duration::from_millis(5)));
/// assert_eq!(parse_delay("12"), Ok(Duration::from_millis(12)));
/// assert!(parse_delay("soon").is_err());
/// ```
pub fn parse_delay(value: &str) -> Result<Duration, String> {
    let value = value.trim().trim_matches('"');
    if let Ok(millis) = value.parse::<u64>() {
        return Ok(Duration::from_millis(millis));
    }
    humantime::parse_duration(value).map_err(|e| format!("Invalid delay '{}': {}", value, e))
}

/// Format a delay for `tc ... netem delay`
pub fn format_delay(delay: Duration) -> String {
    if delay.subsec_nanos() % 1_000_000 == 0 {
        format!("{}ms", delay.as_millis())
    } else {
        format!("{}us", delay.as_micros())
    }
}
