use std::{env, path::PathBuf};

use chrono::{DateTime, Local};

pub const PROGRAM_NAME: &str = "shadowtrace";
pub const PROGRAM_LOG_LEVEL: &str = "SHADOWTRACE_LOG_LEVEL";
pub const REPORT_FILE_PREFIX: &str = "report";

/// Record slots reserved by a fresh collection before the first doubling.
pub const DEFAULT_INITIAL_CAPACITY: usize = 100;

/// Number of monitoring rounds when none is given.
pub const DEFAULT_SCAN_COUNT: usize = 10;

/// Seconds to wait between two monitoring rounds.
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 60;

/// Snapshots kept in memory by a running monitor; older ones are dropped.
pub const MAX_SNAPSHOT_HISTORY: usize = 10;

/// A file modified more often than this over a run is reported.
pub const DEFAULT_MOD_THRESHOLD: u32 = 3;

/// A file whose size grows by at least this factor between two rounds is reported.
pub const DEFAULT_GROWTH_FACTOR: f64 = 2.0;

/// Default directory for the program to scan
pub fn default_scan_root() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Directory where monitoring reports are written when no explicit path is given.
pub fn report_dir() -> PathBuf {
    // Check XDG_STATE_HOME first (Linux)
    if let Ok(xdg_state) = env::var("XDG_STATE_HOME")
        && !xdg_state.is_empty()
    {
        return PathBuf::from(xdg_state).join(PROGRAM_NAME);
    }

    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|p| p.join(PROGRAM_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Timestamped report path under [`report_dir`].
pub fn default_report_path(now: DateTime<Local>) -> PathBuf {
    report_dir().join(format!(
        "{}-{}.txt",
        REPORT_FILE_PREFIX,
        now.format("%Y%m%d-%H%M%S")
    ))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
