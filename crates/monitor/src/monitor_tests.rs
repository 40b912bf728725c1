use super::*;
use std::fs::{remove_file, write};

#[derive(Default)]
struct Recording {
    started: Vec<usize>,
    finished: Vec<usize>,
    failed: Vec<usize>,
    waits: usize,
    stop_after: Option<usize>,
}

impl MonitorObserver for Recording {
    fn round_started(&mut self, round: usize, _total: usize) {
        self.started.push(round);
    }

    fn round_finished(&mut self, outcome: &RoundOutcome) {
        self.finished.push(outcome.round);
    }

    fn round_failed(&mut self, round: usize, _error: &anyhow::Error) {
        self.failed.push(round);
    }

    fn waiting(&mut self, _interval: Duration) {
        self.waits += 1;
    }

    fn keep_going(&self) -> bool {
        self.stop_after
            .is_none_or(|n| self.finished.len() + self.failed.len() < n)
    }
}

fn config(dir: &Path, scans: usize) -> MonitorConfig {
    MonitorConfig {
        scans,
        interval: Duration::ZERO,
        initial_capacity: 2,
        ..MonitorConfig::new(dir)
    }
}

fn names(records: &[FileRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn config_new_uses_runtime_defaults() {
    let cfg = MonitorConfig::new("/tmp");
    assert_eq!(cfg.scans, DEFAULT_SCAN_COUNT);
    assert_eq!(cfg.interval, Duration::from_secs(DEFAULT_SCAN_INTERVAL_SECS));
    assert_eq!(cfg.initial_capacity, DEFAULT_INITIAL_CAPACITY);
    assert_eq!(cfg.history_limit, MAX_SNAPSHOT_HISTORY);
}

#[test]
fn run_round_reports_changes_after_first_round() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();
    write(root.join("keep.txt"), b"k").expect("write keep");
    write(root.join("gone.txt"), b"g").expect("write gone");
    write(root.join("grow.txt"), b"1").expect("write grow");

    let mut monitor = Monitor::new(config(root, 2));

    let first = monitor.run_round(1).expect("round 1");
    assert_eq!(first.files, 3);
    assert!(first.changes.is_none());

    remove_file(root.join("gone.txt")).expect("remove gone");
    write(root.join("grow.txt"), b"12345").expect("grow");
    write(root.join("new.txt"), b"n").expect("write new");

    let second = monitor.run_round(2).expect("round 2");
    let changes = second.changes.expect("changes in round 2");
    assert_eq!(names(&changes.added), vec!["new.txt"]);
    assert_eq!(names(&changes.deleted), vec!["gone.txt"]);
    assert_eq!(names(&changes.modified), vec!["grow.txt"]);

    let growth = second
        .anomalies
        .iter()
        .find(|a| matches!(a, Anomaly::SuddenGrowth { .. }))
        .expect("growth anomaly");
    assert!(growth.path().ends_with("grow.txt"));

    let report = monitor.report();
    assert_eq!(report.completed_scans, 2);
    assert_eq!(names(&report.added), vec!["new.txt"]);
    assert_eq!(report.anomalies.len(), second.anomalies.len());
}

#[test]
fn run_round_failure_keeps_previous_snapshot() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let missing = tmp.path().join("missing");

    let mut monitor = Monitor::new(config(&missing, 1));
    let err = monitor.run_round(1).unwrap_err();

    assert!(format!("{err:#}").contains("failed to scan"));
    assert!(monitor.history().is_empty());
    assert!(monitor.profile().is_empty());
    assert_eq!(monitor.report().completed_scans, 0);
}

#[test]
fn history_is_bounded() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    write(tmp.path().join("a.txt"), b"a").expect("write");

    let mut monitor = Monitor::new(MonitorConfig {
        history_limit: 2,
        ..config(tmp.path(), 5)
    });
    for round in 1..=5 {
        monitor.run_round(round).expect("round");
    }

    assert_eq!(monitor.history().len(), 2);
}

#[test]
fn run_with_sleep_drives_every_round() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path().to_path_buf();
    write(root.join("base.txt"), b"b").expect("write base");

    let mut observer = Recording::default();
    let mut sleeps = 0;
    let report = Monitor::new(config(&root, 3)).run_with_sleep(&mut observer, |_| {
        sleeps += 1;
        write(root.join(format!("added-{sleeps}.txt")), b"x").expect("write added");
    });

    assert_eq!(observer.started, vec![1, 2, 3]);
    assert_eq!(observer.finished, vec![1, 2, 3]);
    assert!(observer.failed.is_empty());
    assert_eq!(observer.waits, 2);
    assert_eq!(sleeps, 2);

    assert_eq!(report.total_scans, 3);
    assert_eq!(report.completed_scans, 3);
    assert_eq!(names(&report.added), vec!["added-1.txt", "added-2.txt"]);
    assert!(report.deleted.is_empty());
    assert!(report.finished_at.is_some());
}

#[test]
fn observer_can_end_run_early() {
    let tmp = tempfile::tempdir().expect("create temp dir");

    let mut observer = Recording {
        stop_after: Some(2),
        ..Recording::default()
    };
    let mut sleeps = 0;
    let report = Monitor::new(config(tmp.path(), 5)).run_with_sleep(&mut observer, |_| sleeps += 1);

    assert_eq!(observer.started, vec![1, 2]);
    assert_eq!(observer.waits, 1);
    assert_eq!(sleeps, 1, "no sleep after the run is stopped");
    assert_eq!(report.total_scans, 5);
    assert_eq!(report.completed_scans, 2);
    assert!(report.finished_at.is_some());
}

#[test]
fn run_reports_failed_rounds() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let missing = tmp.path().join("missing");

    let mut observer = Recording::default();
    let report = Monitor::new(config(&missing, 2)).run(&mut observer);

    assert_eq!(observer.failed, vec![1, 2]);
    assert!(observer.finished.is_empty());
    assert_eq!(report.completed_scans, 0);
}

#[test]
fn report_serializes_anomalies_with_kind_tag() {
    let mut report = MonitorReport::new(&MonitorConfig::new("/d"));
    report.anomalies.push(Anomaly::FrequentModification {
        path: "/d/a".into(),
        count: 5,
    });

    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["anomalies"][0]["kind"], "frequent_modification");
    assert_eq!(json["anomalies"][0]["count"], 5);
    assert_eq!(json["directory"], "/d");
}
