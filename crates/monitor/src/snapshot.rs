use chrono::{DateTime, Local};
use hashbrown::HashMap;
use serde::Serialize;
use shadowtrace_fs::{FileRecord, RecordCollection};

/// The files of one directory at one point in time, keyed by full path.
#[derive(Debug, Clone)]
pub struct Snapshot {
    taken_at: DateTime<Local>,
    files: HashMap<String, FileRecord>,
}

impl Snapshot {
    pub fn from_records(
        records: impl IntoIterator<Item = FileRecord>,
        taken_at: DateTime<Local>,
    ) -> Self {
        let files = records
            .into_iter()
            .map(|r| (r.full_path.clone(), r))
            .collect();
        Self { taken_at, files }
    }

    pub fn from_collection(collection: &RecordCollection, taken_at: DateTime<Local>) -> Self {
        Self::from_records(collection.iter().cloned(), taken_at)
    }

    pub fn taken_at(&self) -> DateTime<Local> {
        self.taken_at
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileRecord)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Records ordered by path.
    pub fn sorted(&self) -> Vec<&FileRecord> {
        let mut records: Vec<&FileRecord> = self.files.values().collect();
        records.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        records
    }
}

/// Files that appeared, disappeared or changed between two snapshots.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ChangeSet {
    pub added: Vec<FileRecord>,
    pub deleted: Vec<FileRecord>,
    pub modified: Vec<FileRecord>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.deleted.len() + self.modified.len()
    }
}

/// Compare two snapshots of the same directory.
///
/// A file counts as modified when its size or modification time differs.
/// Modified entries carry the newer record. Every list is sorted by path.
pub fn diff(old: &Snapshot, new: &Snapshot) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (path, record) in &new.files {
        match old.files.get(path) {
            None => changes.added.push(record.clone()),
            Some(prev) if prev.size != record.size || prev.modified_at != record.modified_at => {
                changes.modified.push(record.clone())
            }
            Some(_) => {}
        }
    }

    for (path, record) in &old.files {
        if !new.files.contains_key(path) {
            changes.deleted.push(record.clone());
        }
    }

    for list in [
        &mut changes.added,
        &mut changes.deleted,
        &mut changes.modified,
    ] {
        list.sort_by(|a, b| a.full_path.cmp(&b.full_path));
    }

    changes
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
