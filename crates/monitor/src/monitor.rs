use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::Serialize;
use shadowtrace_fs::{FileRecord, RecordCollection, scan};
use shadowtrace_runtime::{
    DEFAULT_INITIAL_CAPACITY, DEFAULT_SCAN_COUNT, DEFAULT_SCAN_INTERVAL_SECS, MAX_SNAPSHOT_HISTORY,
};

use crate::{
    profile::{Anomaly, BehaviorProfile, Thresholds, detect_anomalies},
    snapshot::{ChangeSet, Snapshot, diff},
};

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub directory: PathBuf,
    /// Number of rounds to run
    pub scans: usize,
    /// Pause between two rounds (none after the last)
    pub interval: Duration,
    /// Slots reserved by each round's record collection
    pub initial_capacity: usize,
    pub thresholds: Thresholds,
    /// Snapshots kept for diffing
    pub history_limit: usize,
}

impl MonitorConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            scans: DEFAULT_SCAN_COUNT,
            interval: Duration::from_secs(DEFAULT_SCAN_INTERVAL_SECS),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            thresholds: Thresholds::default(),
            history_limit: MAX_SNAPSHOT_HISTORY,
        }
    }
}

/// Result of one monitoring round.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// 1-based round number
    pub round: usize,
    pub scanned_at: DateTime<Local>,
    pub files: usize,
    /// `None` when there was no earlier snapshot to compare against.
    pub changes: Option<ChangeSet>,
    pub anomalies: Vec<Anomaly>,
}

/// Hooks called while a monitor runs. Every method defaults to doing nothing.
pub trait MonitorObserver {
    fn round_started(&mut self, _round: usize, _total: usize) {}

    fn round_finished(&mut self, _outcome: &RoundOutcome) {}

    fn round_failed(&mut self, _round: usize, _error: &anyhow::Error) {}

    fn waiting(&mut self, _interval: Duration) {}

    /// Checked after every round; `false` ends the run early.
    fn keep_going(&self) -> bool {
        true
    }
}

impl MonitorObserver for () {}

/// Everything a monitor observed over its run.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub directory: PathBuf,
    pub total_scans: usize,
    pub completed_scans: usize,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub anomalies: Vec<Anomaly>,
    pub added: Vec<FileRecord>,
    pub deleted: Vec<FileRecord>,
    pub modified: Vec<FileRecord>,
}

impl MonitorReport {
    fn new(config: &MonitorConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            total_scans: config.scans,
            completed_scans: 0,
            started_at: Local::now(),
            finished_at: None,
            anomalies: Vec::new(),
            added: Vec::new(),
            deleted: Vec::new(),
            modified: Vec::new(),
        }
    }

    fn absorb(&mut self, outcome: &RoundOutcome) {
        self.completed_scans += 1;
        if let Some(changes) = &outcome.changes {
            self.added.extend(changes.added.iter().cloned());
            self.deleted.extend(changes.deleted.iter().cloned());
            self.modified.extend(changes.modified.iter().cloned());
        }
        self.anomalies.extend(outcome.anomalies.iter().cloned());
    }
}

/// Repeatedly scans one directory and reports what changed between rounds.
pub struct Monitor {
    config: MonitorConfig,
    history: VecDeque<Snapshot>,
    profile: BehaviorProfile,
    report: MonitorReport,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        let report = MonitorReport::new(&config);
        Self {
            history: VecDeque::with_capacity(config.history_limit),
            profile: BehaviorProfile::new(),
            report,
            config,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn history(&self) -> &VecDeque<Snapshot> {
        &self.history
    }

    pub fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    pub fn report(&self) -> &MonitorReport {
        &self.report
    }

    pub fn into_report(mut self) -> MonitorReport {
        self.report.finished_at = Some(Local::now());
        self.report
    }

    /// Run every configured round, sleeping on the current thread in between.
    pub fn run(self, observer: &mut impl MonitorObserver) -> MonitorReport {
        self.run_with_sleep(observer, thread::sleep)
    }

    pub fn run_with_sleep(
        mut self,
        observer: &mut impl MonitorObserver,
        mut sleep: impl FnMut(Duration),
    ) -> MonitorReport {
        let total = self.config.scans;
        info!(
            "[monitor] watching {:?}: {} rounds every {:?}",
            self.config.directory, total, self.config.interval
        );

        for round in 1..=total {
            observer.round_started(round, total);

            match self.run_round(round) {
                Ok(outcome) => observer.round_finished(&outcome),
                Err(e) => {
                    warn!("[monitor] round {round} skipped: {e:#}");
                    observer.round_failed(round, &e);
                }
            }

            if !observer.keep_going() {
                warn!("[monitor] observer stopped the run after round {round} of {total}");
                break;
            }

            if round < total {
                observer.waiting(self.config.interval);
                sleep(self.config.interval);
            }
        }

        self.into_report()
    }

    /// Scan once, compare with the previous round and look for anomalies.
    ///
    /// A failed scan leaves history and profile untouched, so the next
    /// successful round is compared with the last good snapshot.
    pub fn run_round(&mut self, round: usize) -> Result<RoundOutcome> {
        let snapshot = take_snapshot(&self.config.directory, self.config.initial_capacity)?;

        self.profile.update(&snapshot);
        let changes = self.history.back().map(|prev| diff(prev, &snapshot));
        let anomalies = detect_anomalies(&snapshot, &self.profile, &self.config.thresholds);

        let outcome = RoundOutcome {
            round,
            scanned_at: snapshot.taken_at(),
            files: snapshot.len(),
            changes,
            anomalies,
        };

        self.history.push_back(snapshot);
        while self.history.len() > self.config.history_limit.max(1) {
            self.history.pop_front();
        }

        self.report.absorb(&outcome);
        Ok(outcome)
    }
}

fn take_snapshot(dir: &Path, initial_capacity: usize) -> Result<Snapshot> {
    let mut collection = RecordCollection::with_capacity(initial_capacity)
        .context("failed to create record collection")?;

    let summary = scan(&mut collection, dir)
        .with_context(|| format!("failed to scan {}", dir.display()))?;
    debug!(
        "[monitor] {:?}: {} files, {} dirs skipped",
        dir, summary.appended, summary.skipped_dirs
    );

    Ok(Snapshot::from_records(collection.into_records(), Local::now()))
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
