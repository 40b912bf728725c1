use std::{
    ffi::OsString,
    fs::{self, FileType, Metadata},
    io,
    path::Path,
};

use crate::ticks::RawTimestamp;

/// File size as the enumeration primitive reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySize {
    Split { high: u32, low: u32 },
    Native(u64),
}

impl EntrySize {
    pub fn to_i64(self) -> i64 {
        let bytes = match self {
            EntrySize::Split { high, low } => ((high as u64) << 32) | low as u64,
            EntrySize::Native(n) => n,
        };
        i64::try_from(bytes).unwrap_or(i64::MAX)
    }
}

/// What an entry is once symlinks are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
    /// FIFOs, sockets, devices and dangling symlinks.
    Special,
}

impl EntryType {
    pub fn of(file_type: FileType) -> Self {
        if file_type.is_dir() {
            EntryType::Directory
        } else if file_type.is_file() {
            EntryType::File
        } else {
            EntryType::Special
        }
    }
}

/// One item yielded while enumerating a directory.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub name: OsString,
    pub kind: EntryType,
    pub size: EntrySize,
    pub created: RawTimestamp,
    pub accessed: RawTimestamp,
    pub modified: RawTimestamp,
}

/// Directory-enumeration primitive used by the scanner.
///
/// `open` acquires the enumeration handle; dropping the returned iterator
/// releases it.
pub trait EntrySource {
    type Entries: Iterator<Item = io::Result<RawEntry>>;

    fn open(&self, dir: &Path) -> io::Result<Self::Entries>;
}

/// [`EntrySource`] backed by [`std::fs::read_dir`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StdEntrySource;

pub struct StdEntries {
    inner: fs::ReadDir,
}

impl EntrySource for StdEntrySource {
    type Entries = StdEntries;

    fn open(&self, dir: &Path) -> io::Result<StdEntries> {
        Ok(StdEntries {
            inner: fs::read_dir(dir)?,
        })
    }
}

impl Iterator for StdEntries {
    type Item = io::Result<RawEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|res| res.and_then(raw_entry))
    }
}

fn raw_entry(entry: fs::DirEntry) -> io::Result<RawEntry> {
    // DirEntry::metadata does not follow symlinks; a link is described by its
    // target, and a dangling link by itself.
    let own = entry.metadata()?;
    let metadata = if own.file_type().is_symlink() {
        fs::metadata(entry.path()).unwrap_or(own)
    } else {
        own
    };
    let (created, accessed, modified) = native_times(&metadata);

    Ok(RawEntry {
        name: entry.file_name(),
        kind: EntryType::of(metadata.file_type()),
        size: EntrySize::Native(metadata.len()),
        created,
        accessed,
        modified,
    })
}

#[cfg(windows)]
fn native_times(metadata: &Metadata) -> (RawTimestamp, RawTimestamp, RawTimestamp) {
    use std::os::windows::fs::MetadataExt;

    let split = |ft: u64| RawTimestamp::FileTime {
        high: (ft >> 32) as u32,
        low: ft as u32,
    };
    (
        split(metadata.creation_time()),
        split(metadata.last_access_time()),
        split(metadata.last_write_time()),
    )
}

#[cfg(not(windows))]
fn native_times(metadata: &Metadata) -> (RawTimestamp, RawTimestamp, RawTimestamp) {
    (
        RawTimestamp::from_result(metadata.created()),
        RawTimestamp::from_result(metadata.accessed()),
        RawTimestamp::from_result(metadata.modified()),
    )
}
