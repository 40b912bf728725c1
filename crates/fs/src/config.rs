/// Synthetic entries some enumeration primitives yield for the directory itself and its parent.
pub const SYNTHETIC_ENTRIES: [&str; 2] = [".", ".."];

/// 100-nanosecond ticks per second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks between 1601-01-01T00:00:00Z (tick zero) and the Unix epoch.
pub const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;
