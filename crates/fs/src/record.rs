use serde::{Deserialize, Serialize};

/// Metadata captured for one regular file during a scan.
///
/// Timestamps are 100ns ticks since 1601-01-01 UTC, see [`crate::ticks`].
/// A value of 0 means the platform did not report that timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File name, no separators
    pub name: String,
    /// Directory path joined with `name`
    pub full_path: String,
    /// Size in bytes as reported at scan time
    pub size: i64,
    pub created_at: i64,
    pub accessed_at: i64,
    pub modified_at: i64,
}
