//! Timestamp comparison with HTTP-date granularity.

use std::time::{Duration, SystemTime};

/// One second, the tolerance within which two timestamps are considered equal.
///
/// HTTP dates round to whole seconds while filesystem timestamps are
/// sub-second, so equality checks between the two must allow a sub-second
/// difference in either direction.
pub const SECOND: Duration = Duration::from_secs(1);

/// Returns `true` when the two timestamps differ by less than one second.
pub fn timestamps_match(a: SystemTime, b: SystemTime) -> bool {
    let delta = match a.duration_since(b) {
        Ok(d) => d,
        Err(e) => e.duration(),
    };
    delta < SECOND
}
