mod monitor;
mod report;

use std::{
    io::{self, Write},
    path::Path,
    time::Duration,
};

use clap::ValueEnum;
use shadowtrace_fs::{FileRecord, ScanSummary, ticks};
use shadowtrace_monitor::format_file_size;

pub use monitor::{HumanMonitorPrinter, JsonMonitorPrinter};
pub use report::render_report;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with optional colors.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Color handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect TTY and enable colors if appropriate.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn resolve_stdout(self) -> bool {
        use std::io::IsTerminal;

        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Tone {
    Added,
    Deleted,
    Modified,
    Alert,
    Ok,
    Info,
}

/// Wrap `text` in an ANSI color when enabled.
pub(crate) fn paint(enabled: bool, tone: Tone, text: &str) -> String {
    if !enabled {
        return text.to_owned();
    }
    let code = match tone {
        Tone::Added => "34",
        Tone::Deleted => "36",
        Tone::Modified => "33",
        Tone::Alert => "31",
        Tone::Ok => "32",
        Tone::Info => "35",
    };
    format!("\x1b[{code}m{text}\x1b[0m")
}

/// `YYYY-MM-DD HH:MM:SS` in local time, or `-` when unavailable.
pub(crate) fn format_ticks(value: i64) -> String {
    ticks::to_datetime(value)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_owned())
}

fn rfc3339_ticks(value: i64) -> Option<String> {
    ticks::to_datetime(value).map(|dt| dt.to_rfc3339())
}

/// Configuration for printing scan results.
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    pub format: OutputFormat,
    pub color: ColorChoice,
    /// Maximum number of records to print; 0 prints all.
    pub limit: usize,
    pub show_timing: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorChoice::Auto,
            limit: 100,
            show_timing: true,
        }
    }
}

/// Static context about a scan being printed.
#[derive(Debug)]
pub struct ScanPrintContext<'a> {
    pub directory: &'a Path,
    pub summary: &'a ScanSummary,
    /// Total number of records (before limit)
    pub total: usize,
    pub truncated: bool,
    pub elapsed: Option<Duration>,
}

/// Trait for printing scan results.
///
/// Implementations receive the records one by one between `begin` and
/// `finish`.
pub trait RecordPrinter {
    fn begin(&mut self, ctx: &ScanPrintContext) -> io::Result<()>;

    fn print_record(&mut self, record: &FileRecord, ctx: &ScanPrintContext) -> io::Result<()>;

    fn finish(&mut self, ctx: &ScanPrintContext) -> io::Result<()>;
}

/// Human-readable table printer.
pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    use_color: bool,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        // Only stdout can be probed for a TTY; any other writer gets Auto = off.
        let use_color = cfg.color == ColorChoice::Always;
        Self {
            out,
            err,
            cfg,
            use_color,
        }
    }
}

impl HumanPrinter<io::Stdout, io::Stderr> {
    /// Create a printer that writes to stdout and stderr with TTY detection.
    pub fn stdout(cfg: PrinterConfig) -> Self {
        let use_color = cfg.color.resolve_stdout();
        HumanPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
            use_color,
        }
    }
}

impl<W: Write, E: Write> RecordPrinter for HumanPrinter<W, E> {
    fn begin(&mut self, _ctx: &ScanPrintContext) -> io::Result<()> {
        writeln!(
            self.out,
            "{:>12}  {:<19}  {:<19}  PATH",
            "SIZE", "CREATED", "MODIFIED"
        )?;
        writeln!(self.out, "{}", "-".repeat(72))
    }

    fn print_record(&mut self, record: &FileRecord, _ctx: &ScanPrintContext) -> io::Result<()> {
        writeln!(
            self.out,
            "{:>12}  {:<19}  {:<19}  {}",
            format_file_size(record.size),
            format_ticks(record.created_at),
            format_ticks(record.modified_at),
            paint(self.use_color, Tone::Ok, &record.full_path)
        )
    }

    fn finish(&mut self, ctx: &ScanPrintContext) -> io::Result<()> {
        if ctx.truncated {
            let remaining = ctx.total.saturating_sub(self.cfg.limit);
            writeln!(self.out, "... and {} more files", remaining)?;
        }

        if self.cfg.show_timing {
            let ms = ctx.elapsed.unwrap_or_default().as_secs_f64() * 1000.0;
            writeln!(
                self.err,
                "\n[scan] {} files in {} ({} dirs, {} special, {} unreadable skipped) in {:.2}ms",
                ctx.total,
                ctx.directory.display(),
                ctx.summary.skipped_dirs,
                ctx.summary.skipped_special,
                ctx.summary.skipped_unreadable,
                ms,
            )?;
        }

        Ok(())
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }
}

impl JsonPrinter<io::Stdout, io::Stderr> {
    pub fn stdout(cfg: PrinterConfig) -> Self {
        JsonPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
        }
    }
}

impl<W: Write, E: Write> RecordPrinter for JsonPrinter<W, E> {
    fn begin(&mut self, _ctx: &ScanPrintContext) -> io::Result<()> {
        Ok(())
    }

    fn print_record(&mut self, record: &FileRecord, _ctx: &ScanPrintContext) -> io::Result<()> {
        let obj = serde_json::json!({
            "name": record.name,
            "path": record.full_path,
            "size": record.size,
            "created_at": record.created_at,
            "accessed_at": record.accessed_at,
            "modified_at": record.modified_at,
            "created": rfc3339_ticks(record.created_at),
            "accessed": rfc3339_ticks(record.accessed_at),
            "modified": rfc3339_ticks(record.modified_at),
        });
        writeln!(self.out, "{}", obj)
    }

    fn finish(&mut self, ctx: &ScanPrintContext) -> io::Result<()> {
        if self.cfg.show_timing {
            let obj = serde_json::json!({
                "type": "summary",
                "directory": ctx.directory.display().to_string(),
                "total": ctx.total,
                "truncated": ctx.truncated,
                "skipped_dirs": ctx.summary.skipped_dirs,
                "skipped_special": ctx.summary.skipped_special,
                "skipped_unreadable": ctx.summary.skipped_unreadable,
                "timing_ms": ctx.elapsed.unwrap_or_default().as_secs_f64() * 1000.0,
            });
            writeln!(self.err, "{}", obj)?;
        }

        Ok(())
    }
}

/// Print `records` through `printer`, honoring the configured limit.
pub fn print_records(
    printer: &mut dyn RecordPrinter,
    records: &[FileRecord],
    ctx: &ScanPrintContext,
    limit: usize,
) -> io::Result<()> {
    printer.begin(ctx)?;
    let shown = if limit == 0 { records.len() } else { limit };
    for record in records.iter().take(shown) {
        printer.print_record(record, ctx)?;
    }
    printer.finish(ctx)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
