use super::*;
use clap::Parser;

use crate::{Cli, commands::Command};

fn parse_monitor(argv: &[&str]) -> MonitorArgs {
    let cli = Cli::try_parse_from(argv).expect("parse");
    match cli.command {
        Command::Monitor(args) => args,
        other => panic!("expected monitor, got {other:?}"),
    }
}

#[test]
fn monitor_args_use_runtime_defaults() {
    let args = parse_monitor(&["shadowtrace", "monitor", "/data"]);

    assert_eq!(args.path, Some(PathBuf::from("/data")));
    assert_eq!(args.scans, DEFAULT_SCAN_COUNT);
    assert_eq!(args.interval, DEFAULT_SCAN_INTERVAL_SECS);
    assert_eq!(args.mod_threshold, DEFAULT_MOD_THRESHOLD);
    assert_eq!(args.growth_factor, DEFAULT_GROWTH_FACTOR);
    assert!(args.report.is_none());
    assert!(!args.json);
    assert_eq!(args.color, ColorChoice::Auto);

    let plain = parse_monitor(&["shadowtrace", "monitor", "--color", "never"]);
    assert_eq!(plain.color, ColorChoice::Never);
}

#[test]
fn report_flag_accepts_optional_path() {
    let bare = parse_monitor(&["shadowtrace", "monitor", "/data", "--report"]);
    assert_eq!(bare.report, Some(None));

    let explicit = parse_monitor(&["shadowtrace", "monitor", "/data", "--report", "out.txt"]);
    assert_eq!(explicit.report, Some(Some(PathBuf::from("out.txt"))));
}

#[test]
fn build_config_maps_arguments() {
    let args = parse_monitor(&[
        "shadowtrace",
        "monitor",
        "/data",
        "--scans",
        "3",
        "--interval",
        "5",
        "--mod-threshold",
        "1",
        "--growth-factor",
        "1.5",
    ]);

    let cfg = build_config(&args).expect("config");
    assert_eq!(cfg.directory, PathBuf::from("/data"));
    assert_eq!(cfg.scans, 3);
    assert_eq!(cfg.interval, Duration::from_secs(5));
    assert_eq!(cfg.thresholds.mod_threshold, 1);
    assert_eq!(cfg.thresholds.growth_factor, 1.5);
}

#[test]
fn build_config_rejects_invalid_values() {
    let zero = parse_monitor(&["shadowtrace", "monitor", "--scans", "0"]);
    assert!(build_config(&zero).is_err());

    let negative = parse_monitor(&["shadowtrace", "monitor", "--growth-factor=-2"]);
    assert!(build_config(&negative).is_err());
}

#[test]
fn execute_writes_report_file() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let watched = tmp.path().join("watched");
    fs::create_dir(&watched).expect("create watched");
    fs::write(watched.join("a.txt"), b"a").expect("write a.txt");
    let report_path = tmp.path().join("reports").join("run.txt");

    let args = MonitorArgs {
        path: Some(watched),
        scans: 1,
        interval: 0,
        mod_threshold: DEFAULT_MOD_THRESHOLD,
        growth_factor: DEFAULT_GROWTH_FACTOR,
        json: true,
        color: ColorChoice::Never,
        report: Some(Some(report_path.clone())),
    };

    let code = execute(args).expect("execute");
    assert_eq!(code, ExitCode::SUCCESS);

    let text = fs::read_to_string(&report_path).expect("read report");
    assert!(text.contains("Total Scans Completed: 1/1"));
    assert!(text.contains("System Status: Normal"));
}

#[test]
fn execute_reports_soft_failure_for_missing_directory() {
    let tmp = tempfile::tempdir().expect("create temp dir");

    let args = MonitorArgs {
        path: Some(tmp.path().join("missing")),
        scans: 1,
        interval: 0,
        mod_threshold: DEFAULT_MOD_THRESHOLD,
        growth_factor: DEFAULT_GROWTH_FACTOR,
        json: true,
        color: ColorChoice::Never,
        report: None,
    };

    assert_eq!(execute(args).expect("execute"), ExitCode::from(1));
}
