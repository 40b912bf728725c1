use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Args;
use log::error;
use shadowtrace_monitor::{Monitor, MonitorConfig, MonitorReport, Thresholds};
use shadowtrace_runtime::{
    DEFAULT_GROWTH_FACTOR, DEFAULT_INITIAL_CAPACITY, DEFAULT_MOD_THRESHOLD, DEFAULT_SCAN_COUNT,
    DEFAULT_SCAN_INTERVAL_SECS, MAX_SNAPSHOT_HISTORY, default_report_path, default_scan_root,
};

use crate::printer::{ColorChoice, HumanMonitorPrinter, JsonMonitorPrinter, render_report};

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Directory to monitor (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Number of scans to run
    #[arg(long, short = 's', default_value_t = DEFAULT_SCAN_COUNT)]
    pub scans: usize,

    /// Seconds between two scans
    #[arg(long, short = 'i', default_value_t = DEFAULT_SCAN_INTERVAL_SECS)]
    pub interval: u64,

    /// Flag files modified more than this many times
    #[arg(long, default_value_t = DEFAULT_MOD_THRESHOLD)]
    pub mod_threshold: u32,

    /// Flag files whose size grows by at least this factor between scans
    #[arg(long, default_value_t = DEFAULT_GROWTH_FACTOR)]
    pub growth_factor: f64,

    /// Emit NDJSON instead of human-readable progress
    #[arg(long)]
    pub json: bool,

    /// When to use colors
    #[arg(long, value_name = "WHEN", value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Write a text report when done; without a value it goes to the state directory
    #[arg(long, num_args = 0..=1, value_name = "FILE")]
    pub report: Option<Option<PathBuf>>,
}

pub fn run(args: MonitorArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            error!("[error] {e:#}");
            eprintln!("[monitor] {e:#}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: MonitorArgs) -> Result<ExitCode> {
    let config = build_config(&args)?;

    let report = if args.json {
        let mut printer = JsonMonitorPrinter::stdout();
        let report = Monitor::new(config).run(&mut printer);
        printer
            .print_summary(&report)
            .context("failed to write monitoring summary")?;
        report
    } else {
        let mut printer = HumanMonitorPrinter::stdout(args.color);
        let report = Monitor::new(config).run(&mut printer);
        printer
            .print_summary(&report)
            .context("failed to write monitoring summary")?;
        report
    };

    if let Some(target) = &args.report {
        let path = target
            .clone()
            .unwrap_or_else(|| default_report_path(Local::now()));
        write_report(&path, &report)?;
        eprintln!("[monitor] report written to {}", path.display());
    }

    if report.completed_scans == 0 {
        // Every round failed, usually because the directory is missing.
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn build_config(args: &MonitorArgs) -> Result<MonitorConfig> {
    if args.scans == 0 {
        bail!("--scans must be at least 1");
    }
    if !(args.growth_factor.is_finite() && args.growth_factor > 0.0) {
        bail!("--growth-factor must be a positive number");
    }

    let directory = args.path.clone().unwrap_or_else(default_scan_root);
    Ok(MonitorConfig {
        directory,
        scans: args.scans,
        interval: Duration::from_secs(args.interval),
        initial_capacity: DEFAULT_INITIAL_CAPACITY,
        thresholds: Thresholds {
            mod_threshold: args.mod_threshold,
            growth_factor: args.growth_factor,
        },
        history_limit: MAX_SNAPSHOT_HISTORY,
    })
}

fn write_report(path: &Path, report: &MonitorReport) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let text = render_report(report, Local::now());
    fs::write(path, text).with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
