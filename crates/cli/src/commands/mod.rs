pub mod monitor;
pub mod scan;

use clap::Subcommand;
pub use monitor::MonitorArgs;
pub use scan::ScanArgs;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the files directly inside a directory with size and timestamps.
    ///
    /// Example:
    ///   shadowtrace scan /var/log
    ///   shadowtrace scan --json -n 0 .
    Scan(ScanArgs),

    /// Scan a directory repeatedly and report added, deleted and modified
    /// files plus suspicious activity.
    ///
    /// Example:
    ///   shadowtrace monitor ~/Documents --scans 5 --interval 30
    ///   shadowtrace monitor /srv/data --report
    Monitor(MonitorArgs),
}
