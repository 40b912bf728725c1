mod collection;
mod config;
mod error;
mod record;
mod scanner;
mod source;
pub mod ticks;

pub use collection::{RecordCollection, teardown};
pub use error::{AllocationError, AppendError, CollectionError, ScanError};
pub use record::FileRecord;
pub use scanner::{ScanSummary, join_path, scan, scan_with};
pub use source::{EntrySize, EntrySource, EntryType, RawEntry, StdEntries, StdEntrySource};
