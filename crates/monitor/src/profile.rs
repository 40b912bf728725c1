use std::fmt;

use hashbrown::HashMap;
use serde::Serialize;
use shadowtrace_runtime::{DEFAULT_GROWTH_FACTOR, DEFAULT_MOD_THRESHOLD, MAX_SNAPSHOT_HISTORY};

use crate::{snapshot::Snapshot, units::format_file_size};

/// What a monitor has seen of one path across rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProfile {
    /// Rounds in which the modification time changed
    pub mod_count: u32,
    /// Size seen in each round, oldest first, bounded by `MAX_SNAPSHOT_HISTORY`
    pub size_history: Vec<i64>,
    pub last_modified: i64,
}

#[derive(Debug, Default)]
pub struct BehaviorProfile {
    files: HashMap<String, FileProfile>,
}

impl BehaviorProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one round into the profile.
    ///
    /// Paths that disappear keep their profile so a file that comes back
    /// continues its history.
    pub fn update(&mut self, snapshot: &Snapshot) {
        for (path, record) in snapshot.iter() {
            let profile = self
                .files
                .entry_ref(path)
                .or_insert_with(|| FileProfile {
                    mod_count: 0,
                    size_history: Vec::new(),
                    last_modified: record.modified_at,
                });

            if record.modified_at != profile.last_modified {
                profile.mod_count += 1;
                profile.last_modified = record.modified_at;
            }

            if profile.size_history.len() == MAX_SNAPSHOT_HISTORY {
                profile.size_history.remove(0);
            }
            profile.size_history.push(record.size);
        }
    }

    pub fn get(&self, path: &str) -> Option<&FileProfile> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Report files modified more often than this.
    pub mod_threshold: u32,
    /// Report files whose size grew by at least this factor in one round.
    pub growth_factor: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            mod_threshold: DEFAULT_MOD_THRESHOLD,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    FrequentModification { path: String, count: u32 },
    SuddenGrowth {
        path: String,
        previous: i64,
        current: i64,
    },
}

impl Anomaly {
    pub fn path(&self) -> &str {
        match self {
            Anomaly::FrequentModification { path, .. } | Anomaly::SuddenGrowth { path, .. } => path,
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::FrequentModification { path, count } => {
                write!(f, "File modified too often: {path} ({count} times)")
            }
            Anomaly::SuddenGrowth {
                path,
                previous,
                current,
            } => write!(
                f,
                "File grew suddenly: {path} ({} -> {})",
                format_file_size(*previous),
                format_file_size(*current)
            ),
        }
    }
}

/// Anomalies for the files in `snapshot`, ordered by path.
pub fn detect_anomalies(
    snapshot: &Snapshot,
    profile: &BehaviorProfile,
    thresholds: &Thresholds,
) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    for record in snapshot.sorted() {
        let Some(p) = profile.get(&record.full_path) else {
            continue;
        };

        if p.mod_count > thresholds.mod_threshold {
            anomalies.push(Anomaly::FrequentModification {
                path: record.full_path.clone(),
                count: p.mod_count,
            });
        }

        if let [.., previous, current] = p.size_history[..]
            && previous > 0
            && current as f64 / previous as f64 >= thresholds.growth_factor
        {
            anomalies.push(Anomaly::SuddenGrowth {
                path: record.full_path.clone(),
                previous,
                current,
            });
        }
    }

    anomalies
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
