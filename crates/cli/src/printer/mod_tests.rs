use super::*;
use chrono::{Local, TimeZone};
use shadowtrace_monitor::{Anomaly, ChangeSet, MonitorObserver, MonitorReport, RoundOutcome};
use std::path::PathBuf;

fn rec(name: &str, size: i64) -> FileRecord {
    FileRecord {
        name: name.to_owned(),
        full_path: format!("/data/{name}"),
        size,
        created_at: 0,
        accessed_at: 0,
        // 2020-01-01T00:00:00Z
        modified_at: 132_223_104_000_000_000,
    }
}

fn no_timing() -> PrinterConfig {
    PrinterConfig {
        color: ColorChoice::Never,
        show_timing: false,
        ..PrinterConfig::default()
    }
}

fn ctx<'a>(summary: &'a ScanSummary, total: usize, truncated: bool) -> ScanPrintContext<'a> {
    ScanPrintContext {
        directory: Path::new("/data"),
        summary,
        total,
        truncated,
        elapsed: None,
    }
}

fn report() -> MonitorReport {
    MonitorReport {
        directory: PathBuf::from("/data"),
        total_scans: 3,
        completed_scans: 3,
        started_at: Local::now(),
        finished_at: None,
        anomalies: vec![Anomaly::SuddenGrowth {
            path: "/data/log".into(),
            previous: 1024,
            current: 4096,
        }],
        added: vec![rec("new.txt", 2048)],
        deleted: vec![rec("old.txt", 1)],
        modified: Vec::new(),
    }
}

#[test]
fn paint_only_colors_when_enabled() {
    assert_eq!(paint(false, Tone::Alert, "x"), "x");
    assert_eq!(paint(true, Tone::Alert, "x"), "\x1b[31mx\x1b[0m");
}

#[test]
fn format_ticks_marks_missing_values() {
    assert_eq!(format_ticks(0), "-");
    assert_eq!(format_ticks(132_223_104_000_000_000).len(), 19);
}

#[test]
fn human_printer_limits_rows_and_reports_remaining() {
    let records = vec![rec("a.txt", 1), rec("b.txt", 2048), rec("c.txt", 3)];
    let summary = ScanSummary {
        appended: 3,
        ..ScanSummary::default()
    };
    let cfg = PrinterConfig {
        limit: 2,
        ..no_timing()
    };

    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut printer = HumanPrinter::new(&mut out, &mut err, cfg);
    print_records(&mut printer, &records, &ctx(&summary, 3, true), 2).expect("print");
    drop(printer);

    let text = String::from_utf8(out).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].contains("SIZE") && lines[0].ends_with("PATH"));
    assert!(lines[2].ends_with("/data/a.txt"));
    assert!(lines[3].contains("2.00 KB") && lines[3].ends_with("/data/b.txt"));
    assert_eq!(lines[4], "... and 1 more files");
    assert_eq!(lines.len(), 5);
    assert!(err.is_empty());
}

#[test]
fn json_printer_emits_one_object_per_record() {
    let records = vec![rec("a.txt", 5)];
    let summary = ScanSummary::default();
    let cfg = PrinterConfig {
        show_timing: true,
        ..no_timing()
    };

    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut printer = JsonPrinter::new(&mut out, &mut err, cfg);
    print_records(&mut printer, &records, &ctx(&summary, 1, false), 0).expect("print");
    drop(printer);

    let text = String::from_utf8(out).expect("utf8");
    let row: serde_json::Value = serde_json::from_str(text.trim()).expect("json row");
    assert_eq!(row["name"], "a.txt");
    assert_eq!(row["path"], "/data/a.txt");
    assert_eq!(row["size"], 5);
    assert_eq!(row["created"], serde_json::Value::Null);
    assert_eq!(row["modified"], "2020-01-01T00:00:00+00:00");

    let summary: serde_json::Value =
        serde_json::from_slice(&err).expect("json summary on stderr");
    assert_eq!(summary["type"], "summary");
    assert_eq!(summary["total"], 1);
}

#[test]
fn render_report_lists_every_section() {
    let generated = Local
        .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .expect("valid local time");
    let text = render_report(&report(), generated);

    assert!(text.starts_with("SHADOWTRACE MONITORING REPORT"));
    assert!(text.contains("Report Generated: 2024-05-01 09:30:00"));
    assert!(text.contains("Monitored Directory: /data"));
    assert!(text.contains("TOTAL ANOMALIES: 1"));
    assert!(text.contains("1. File grew suddenly: /data/log (1.00 KB -> 4.00 KB)"));
    assert!(text.contains("   + /data/new.txt\n     Size: 2.00 KB"));
    assert!(text.contains("   - /data/old.txt"));
    assert!(text.contains("Modified Files: None"));
    assert!(text.contains("Total Files Added: 1"));
    assert!(text.contains("ACTION REQUIRED"));
}

#[test]
fn render_report_without_findings_is_normal() {
    let mut quiet = report();
    quiet.anomalies.clear();
    quiet.added.clear();
    quiet.deleted.clear();

    let text = render_report(&quiet, Local::now());
    assert!(text.contains("No anomalies detected during monitoring period."));
    assert!(text.contains("Added Files: None"));
    assert!(text.contains("System Status: Normal"));
}

#[test]
fn human_monitor_printer_writes_round_blocks() {
    let outcome = RoundOutcome {
        round: 2,
        scanned_at: Local::now(),
        files: 4,
        changes: Some(ChangeSet {
            added: vec![rec("new.txt", 1)],
            deleted: Vec::new(),
            modified: vec![rec("log", 4096)],
        }),
        anomalies: report().anomalies,
    };

    let mut printer = HumanMonitorPrinter::new(Vec::new(), ColorChoice::Never);
    printer.round_started(2, 3);
    printer.round_finished(&outcome);
    printer.waiting(Duration::from_secs(60));
    printer.print_summary(&report()).expect("summary");
    let text = String::from_utf8(printer.into_inner()).expect("utf8");

    assert!(text.contains("Scan 2/3 at "));
    assert!(text.contains("Added files: 1\n   + /data/new.txt"));
    assert!(text.contains("Modified files: 1\n   ~ /data/log"));
    assert!(!text.contains("Deleted files"));
    assert!(text.contains("ANOMALIES DETECTED: 1"));
    assert!(text.contains("Waiting 60 seconds until next scan..."));
    assert!(text.contains("Scans completed: 3/3"));
}

#[test]
fn json_monitor_printer_tags_objects() {
    let outcome = RoundOutcome {
        round: 1,
        scanned_at: Local::now(),
        files: 0,
        changes: None,
        anomalies: Vec::new(),
    };

    let mut printer = JsonMonitorPrinter::new(Vec::new());
    printer.round_finished(&outcome);
    printer.round_failed(2, &anyhow::anyhow!("boom"));
    printer.print_summary(&report()).expect("summary");
    let text = String::from_utf8(printer.into_inner()).expect("utf8");

    let kinds: Vec<String> = text
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).expect("json line");
            v["type"].as_str().unwrap_or_default().to_owned()
        })
        .collect();
    assert_eq!(kinds, vec!["round", "error", "report"]);
}

/// Writer whose reader has gone away.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn monitor_printers_stop_run_on_write_failure() {
    use shadowtrace_monitor::{Monitor, MonitorConfig};

    let tmp = tempfile::tempdir().expect("create temp dir");
    let config = MonitorConfig {
        scans: 4,
        interval: Duration::ZERO,
        ..MonitorConfig::new(tmp.path())
    };

    let mut human = HumanMonitorPrinter::new(ClosedPipe, ColorChoice::Never);
    let mut sleeps = 0;
    let report = Monitor::new(config.clone()).run_with_sleep(&mut human, |_| sleeps += 1);
    assert_eq!(report.completed_scans, 1, "stopped after the first round");
    assert_eq!(sleeps, 0);
    let err = human.print_summary(&report).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

    let mut json = JsonMonitorPrinter::new(ClosedPipe);
    let report = Monitor::new(config).run(&mut json);
    assert_eq!(report.completed_scans, 1);
    assert!(json.print_summary(&report).is_err());
}
