//! Tick timestamps: 100-nanosecond units since 1601-01-01T00:00:00Z.
//!
//! This is the Windows FILETIME layout. Every platform is normalized to it so
//! records from different hosts compare directly.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

use crate::config::{TICKS_PER_SECOND, UNIX_EPOCH_TICKS};

/// A timestamp as the enumeration primitive reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTimestamp {
    /// The platform has no value for this timestamp.
    Unavailable,
    /// FILETIME split into its two 32-bit halves.
    FileTime { high: u32, low: u32 },
    System(SystemTime),
}

impl RawTimestamp {
    pub fn from_result<E>(res: Result<SystemTime, E>) -> Self {
        res.map(RawTimestamp::System)
            .unwrap_or(RawTimestamp::Unavailable)
    }

    pub fn to_ticks(self) -> i64 {
        match self {
            RawTimestamp::Unavailable => 0,
            RawTimestamp::FileTime { high, low } => from_filetime(high, low),
            RawTimestamp::System(t) => from_system_time(t),
        }
    }
}

/// Values past `i64::MAX` (high bit set) saturate instead of going negative.
pub fn from_filetime(high: u32, low: u32) -> i64 {
    i64::try_from(((high as u64) << 32) | low as u64).unwrap_or(i64::MAX)
}

pub fn from_system_time(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(after) => UNIX_EPOCH_TICKS.saturating_add(duration_ticks(after)),
        Err(e) => UNIX_EPOCH_TICKS.saturating_sub(duration_ticks(e.duration())),
    }
}

fn duration_ticks(d: Duration) -> i64 {
    i64::try_from(d.as_nanos() / 100).unwrap_or(i64::MAX)
}

/// Wall-clock time for a tick value, or `None` for 0 and out-of-range values.
pub fn to_datetime(ticks: i64) -> Option<DateTime<Utc>> {
    if ticks == 0 {
        return None;
    }

    let since_unix = ticks.checked_sub(UNIX_EPOCH_TICKS)?;
    let secs = since_unix.div_euclid(TICKS_PER_SECOND);
    let nanos = (since_unix.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

#[cfg(test)]
#[path = "ticks_tests.rs"]
mod tests;
