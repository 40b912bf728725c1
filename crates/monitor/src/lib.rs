mod monitor;
mod profile;
mod snapshot;
mod units;

pub use monitor::{Monitor, MonitorConfig, MonitorObserver, MonitorReport, RoundOutcome};
pub use profile::{Anomaly, BehaviorProfile, FileProfile, Thresholds, detect_anomalies};
pub use snapshot::{ChangeSet, Snapshot, diff};
pub use units::format_file_size;
