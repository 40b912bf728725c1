use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Args;
use log::error;
use shadowtrace_fs::{RecordCollection, ScanError, scan, teardown};
use shadowtrace_runtime::{DEFAULT_INITIAL_CAPACITY, default_scan_root};

use crate::printer::{
    ColorChoice, HumanPrinter, JsonPrinter, OutputFormat, PrinterConfig, RecordPrinter,
    ScanPrintContext, print_records,
};

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Emit NDJSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Maximum number of files to print (0 for all)
    #[arg(long, short = 'n', default_value = "100")]
    pub limit: usize,

    /// Record slots to reserve before the first growth
    #[arg(long, default_value_t = DEFAULT_INITIAL_CAPACITY)]
    pub capacity: usize,

    /// Hide the summary line on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// When to use colors
    #[arg(long, value_name = "WHEN", value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

pub fn run(args: ScanArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            error!("[error] {e:#}");
            eprintln!("[scan] {e:#}");
            exit_code_for(&e)
        }
    }
}

/// 1 when the directory could not be opened, 2 for anything else.
fn exit_code_for(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<ScanError>() {
        Some(scan_err) if scan_err.is_open_failure() => ExitCode::from(1),
        _ => ExitCode::from(2),
    }
}

fn execute(args: ScanArgs) -> Result<ExitCode> {
    let dir = args.path.clone().unwrap_or_else(default_scan_root);

    let mut handle = Some(
        RecordCollection::with_capacity(args.capacity)
            .context("failed to create record collection")?,
    );

    let result = match handle.as_mut() {
        Some(collection) => scan_and_print(collection, &dir, &args),
        None => Ok(()),
    };
    teardown(&mut handle);

    result.map(|_| ExitCode::SUCCESS)
}

fn scan_and_print(collection: &mut RecordCollection, dir: &Path, args: &ScanArgs) -> Result<()> {
    let started = Instant::now();
    let summary = scan(collection, dir)?;
    let elapsed = started.elapsed();

    let cfg = PrinterConfig {
        format: OutputFormat::from_json_flag(args.json),
        color: args.color,
        limit: args.limit,
        show_timing: !args.quiet,
        ..PrinterConfig::default()
    };

    let total = collection.len();
    let ctx = ScanPrintContext {
        directory: dir,
        summary: &summary,
        total,
        truncated: args.limit != 0 && total > args.limit,
        elapsed: Some(elapsed),
    };

    let format = cfg.format;
    let mut printer: Box<dyn RecordPrinter> = match format {
        OutputFormat::Human => Box::new(HumanPrinter::stdout(cfg)),
        OutputFormat::Json => Box::new(JsonPrinter::stdout(cfg)),
    };

    print_records(printer.as_mut(), collection.as_slice(), &ctx, args.limit)
        .context("failed to write scan results")
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
