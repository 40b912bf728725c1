use std::{collections::TryReserveError, io, path::PathBuf};

use thiserror::Error;

use crate::record::FileRecord;

/// Memory could not be obtained for record slots or record strings.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("record capacity overflow: cannot grow past {current} slots")]
    CapacityOverflow { current: usize },

    #[error("record capacity limit of {limit} slots reached")]
    LimitExceeded { limit: usize },

    #[error(transparent)]
    Reserve(#[from] TryReserveError),
}

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("initial capacity must be greater than zero")]
    ZeroCapacity,

    #[error("failed to create record collection: {0}")]
    Allocation(#[from] AllocationError),
}

/// A failed [`RecordCollection::append`](crate::RecordCollection::append).
///
/// The collection is left untouched and the rejected record, with its
/// owned name and path, goes back to the caller.
#[derive(Debug, Error)]
#[error("failed to append {:?}: {source}", .record.full_path)]
pub struct AppendError {
    record: FileRecord,
    source: AllocationError,
}

impl AppendError {
    pub(crate) fn new(record: FileRecord, source: AllocationError) -> Self {
        Self { record, source }
    }

    pub fn record(&self) -> &FileRecord {
        &self.record
    }

    pub fn into_record(self) -> FileRecord {
        self.record
    }

    pub fn into_parts(self) -> (FileRecord, AllocationError) {
        (self.record, self.source)
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    /// Record paths are UTF-8, so such a directory is refused before it is opened.
    #[error("directory path {path:?} is not valid UTF-8")]
    NonUtf8Path { path: PathBuf },

    #[error("cannot open directory {path:?}: {source}")]
    DirectoryOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The scan hit an allocation failure and rolled back every record it had
    /// added. `captured` is how many there were.
    #[error("scan of {path:?} aborted after {captured} records: {source}")]
    Aborted {
        path: PathBuf,
        captured: usize,
        #[source]
        source: AllocationError,
    },
}

impl ScanError {
    /// Records captured (and then discarded) before the scan failed.
    pub fn captured(&self) -> usize {
        match self {
            ScanError::NonUtf8Path { .. } | ScanError::DirectoryOpen { .. } => 0,
            ScanError::Aborted { captured, .. } => *captured,
        }
    }

    pub fn is_open_failure(&self) -> bool {
        matches!(self, ScanError::DirectoryOpen { .. })
    }
}
