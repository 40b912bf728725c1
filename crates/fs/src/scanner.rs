use std::{
    collections::TryReserveError,
    path::{MAIN_SEPARATOR, Path},
};

use log::{debug, warn};

use crate::{
    collection::RecordCollection,
    config::SYNTHETIC_ENTRIES,
    error::{AllocationError, ScanError},
    record::FileRecord,
    source::{EntrySource, EntryType, RawEntry, StdEntrySource},
};

/// Counters for one completed scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub appended: usize,
    pub skipped_dirs: usize,
    /// FIFOs, sockets, devices and dangling symlinks.
    pub skipped_special: usize,
    /// Entries the OS failed to describe, or whose name is not UTF-8.
    pub skipped_unreadable: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum EntryKind {
    Directory,
    Synthetic,
    Special,
    File,
}

fn classify(entry: &RawEntry) -> EntryKind {
    match entry.kind {
        EntryType::Directory => EntryKind::Directory,
        _ if SYNTHETIC_ENTRIES.iter().any(|s| entry.name == *s) => EntryKind::Synthetic,
        EntryType::Special => EntryKind::Special,
        EntryType::File => EntryKind::File,
    }
}

/// Append one record per file directly inside `dir` to `collection`.
///
/// Subdirectories, including symlinks to directories, are skipped and never
/// entered. Symlinks to files are recorded with the target's metadata. See
/// [`scan_with`].
pub fn scan(
    collection: &mut RecordCollection,
    dir: impl AsRef<Path>,
) -> Result<ScanSummary, ScanError> {
    scan_with(&StdEntrySource, collection, dir.as_ref())
}

/// Scan `dir` through an explicit enumeration primitive.
///
/// If the directory path is not UTF-8 or the directory cannot be opened, the
/// collection is not touched. An allocation failure part way through aborts
/// the scan and removes every record this call appended, so the collection
/// never holds a partial snapshot; [`ScanError::captured`] tells how far it
/// got.
pub fn scan_with<S: EntrySource>(
    source: &S,
    collection: &mut RecordCollection,
    dir: &Path,
) -> Result<ScanSummary, ScanError> {
    let dir_text = dir.to_str().ok_or_else(|| ScanError::NonUtf8Path {
        path: dir.to_path_buf(),
    })?;
    let entries = source
        .open(dir)
        .map_err(|source| ScanError::DirectoryOpen {
            path: dir.to_path_buf(),
            source,
        })?;

    let start = collection.len();
    let mut summary = ScanSummary::default();

    // `entries` owns the enumeration handle and is dropped on every return below.
    for entry_res in entries {
        let entry = match entry_res {
            Ok(e) => e,
            Err(e) => {
                warn!("[scan] error reading entry in {:?}: {e}", dir);
                summary.skipped_unreadable += 1;
                continue;
            }
        };

        match classify(&entry) {
            EntryKind::Directory => {
                summary.skipped_dirs += 1;
                continue;
            }
            EntryKind::Synthetic => continue,
            EntryKind::Special => {
                debug!("[scan] skipping special entry {:?} in {:?}", entry.name, dir);
                summary.skipped_special += 1;
                continue;
            }
            EntryKind::File => {}
        }

        let Some(name) = entry.name.to_str() else {
            warn!("[scan] skipping non UTF-8 name {:?} in {:?}", entry.name, dir);
            summary.skipped_unreadable += 1;
            continue;
        };

        let record = match build_record(dir_text, name, &entry) {
            Ok(record) => record,
            Err(e) => return Err(abort(collection, start, dir, e.into())),
        };

        if let Err(e) = collection.append(record) {
            let (_, source) = e.into_parts();
            return Err(abort(collection, start, dir, source));
        }
        summary.appended += 1;
    }

    debug!(
        "[scan] {:?}: {} files, {} dirs skipped, {} special, {} unreadable",
        dir,
        summary.appended,
        summary.skipped_dirs,
        summary.skipped_special,
        summary.skipped_unreadable
    );
    Ok(summary)
}

fn abort(
    collection: &mut RecordCollection,
    start: usize,
    dir: &Path,
    source: AllocationError,
) -> ScanError {
    let captured = collection.len() - start;
    collection.truncate(start);
    warn!(
        "[scan] {:?}: aborted after {captured} records, rolled back: {source}",
        dir
    );
    ScanError::Aborted {
        path: dir.to_path_buf(),
        captured,
        source,
    }
}

fn build_record(dir: &str, name: &str, entry: &RawEntry) -> Result<FileRecord, TryReserveError> {
    Ok(FileRecord {
        name: owned_copy(name)?,
        full_path: join_path(dir, name, MAIN_SEPARATOR)?,
        size: entry.size.to_i64(),
        created_at: entry.created.to_ticks(),
        accessed_at: entry.accessed.to_ticks(),
        modified_at: entry.modified.to_ticks(),
    })
}

fn owned_copy(s: &str) -> Result<String, TryReserveError> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())?;
    out.push_str(s);
    Ok(out)
}

/// `dir` + `sep` + `name`, with the separator appearing exactly once between them.
pub fn join_path(dir: &str, name: &str, sep: char) -> Result<String, TryReserveError> {
    let needs_sep = !dir.is_empty() && !dir.ends_with(sep);

    let mut out = String::new();
    out.try_reserve_exact(dir.len() + sep.len_utf8() + name.len())?;
    out.push_str(dir);
    if needs_sep {
        out.push(sep);
    }
    out.push_str(name);
    Ok(out)
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
