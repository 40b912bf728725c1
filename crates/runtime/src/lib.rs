mod config;
pub mod logging;

pub use config::{
    DEFAULT_GROWTH_FACTOR, DEFAULT_INITIAL_CAPACITY, DEFAULT_MOD_THRESHOLD, DEFAULT_SCAN_COUNT,
    DEFAULT_SCAN_INTERVAL_SECS, MAX_SNAPSHOT_HISTORY, PROGRAM_LOG_LEVEL, PROGRAM_NAME,
    REPORT_FILE_PREFIX, default_report_path, default_scan_root, report_dir,
};

pub use logging::init;
