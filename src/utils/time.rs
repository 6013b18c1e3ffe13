//! Instant arithmetic at nanosecond resolution
//!
//! Instants are handled as signed nanoseconds since the Unix epoch in an
//! `i128`, wide enough that adding any `Duration` to any `NumericDate`
//! cannot overflow.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub(crate) const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Signed nanoseconds between the Unix epoch and `time`
pub(crate) fn unix_nanos(time: SystemTime) -> i128 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => duration_nanos(since),
        Err(err) => -duration_nanos(err.duration()),
    }
}

pub(crate) fn duration_nanos(duration: Duration) -> i128 {
    // u128 nanos of a Duration never exceed ~1.8e28, well inside i128
    duration.as_nanos() as i128
}

/// Convert a nanosecond count back into a `Duration`, clamping negatives to zero
pub(crate) fn duration_from_nanos(nanos: i128) -> Duration {
    if nanos <= 0 {
        return Duration::ZERO;
    }
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Duration::new(secs, subsec)
}
