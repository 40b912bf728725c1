use std::fmt::Write;

use chrono::{DateTime, Local};
use shadowtrace_monitor::{MonitorReport, format_file_size};

use super::format_ticks;

const RULE: &str = "============================================================";

/// Plain-text rendering of a finished monitoring run.
pub fn render_report(report: &MonitorReport, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report, generated_at);
    out
}

fn write_report(
    out: &mut String,
    report: &MonitorReport,
    generated_at: DateTime<Local>,
) -> std::fmt::Result {
    writeln!(out, "SHADOWTRACE MONITORING REPORT")?;
    writeln!(out)?;
    writeln!(
        out,
        "Report Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "Monitored Directory: {}", report.directory.display())?;
    writeln!(
        out,
        "Total Scans Completed: {}/{}",
        report.completed_scans, report.total_scans
    )?;

    writeln!(out, "\n{RULE}\nSECURITY ANOMALIES\n{RULE}")?;
    if report.anomalies.is_empty() {
        writeln!(out, "No anomalies detected during monitoring period.")?;
    } else {
        writeln!(out, "TOTAL ANOMALIES: {}\n", report.anomalies.len())?;
        for (i, anomaly) in report.anomalies.iter().enumerate() {
            writeln!(out, "{}. {anomaly}", i + 1)?;
        }
    }

    writeln!(out, "\n{RULE}\nFILE CHANGE SUMMARY\n{RULE}")?;

    if report.added.is_empty() {
        writeln!(out, "Added Files: None\n")?;
    } else {
        writeln!(out, "ADDED FILES ({}):", report.added.len())?;
        for f in &report.added {
            writeln!(out, "   + {}", f.full_path)?;
            writeln!(out, "     Size: {}", format_file_size(f.size))?;
            writeln!(out, "     Created: {}\n", format_ticks(f.created_at))?;
        }
    }

    if report.deleted.is_empty() {
        writeln!(out, "Deleted Files: None\n")?;
    } else {
        writeln!(out, "DELETED FILES ({}):", report.deleted.len())?;
        for f in &report.deleted {
            writeln!(out, "   - {}\n", f.full_path)?;
        }
    }

    if report.modified.is_empty() {
        writeln!(out, "Modified Files: None\n")?;
    } else {
        writeln!(out, "MODIFIED FILES ({}):", report.modified.len())?;
        for f in &report.modified {
            writeln!(out, "   ~ {}", f.full_path)?;
            writeln!(out, "     Size: {}", format_file_size(f.size))?;
            writeln!(out, "     Last Modified: {}\n", format_ticks(f.modified_at))?;
        }
    }

    writeln!(out, "{RULE}\nSTATISTICS\n{RULE}")?;
    writeln!(out, "Total Files Added: {}", report.added.len())?;
    writeln!(out, "Total Files Deleted: {}", report.deleted.len())?;
    writeln!(out, "Total Files Modified: {}", report.modified.len())?;
    writeln!(out, "Total Anomalies: {}", report.anomalies.len())?;

    if report.anomalies.is_empty() {
        writeln!(out, "\nSystem Status: Normal - No suspicious activity detected.")?;
    } else {
        writeln!(out, "\nACTION REQUIRED: Review the anomalies listed above.")?;
    }

    Ok(())
}
