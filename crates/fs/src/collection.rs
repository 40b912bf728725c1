use log::debug;

use crate::{
    error::{AllocationError, AppendError, CollectionError},
    record::FileRecord,
};

/// Growable, owning container of [`FileRecord`]s.
///
/// `capacity` is the number of slots reserved so far. It starts at the
/// requested initial capacity and doubles whenever an append would exceed it.
/// Growth relocates the slot array only; each record's strings move with it.
#[derive(Debug)]
pub struct RecordCollection {
    records: Vec<FileRecord>,
    capacity: usize,
    limit: usize,
}

impl RecordCollection {
    pub fn with_capacity(initial_capacity: usize) -> Result<Self, CollectionError> {
        Self::with_capacity_limit(initial_capacity, usize::MAX)
    }

    /// Like [`with_capacity`](Self::with_capacity), but growth past `limit`
    /// slots fails with [`AllocationError::LimitExceeded`].
    pub fn with_capacity_limit(
        initial_capacity: usize,
        limit: usize,
    ) -> Result<Self, CollectionError> {
        if initial_capacity == 0 {
            return Err(CollectionError::ZeroCapacity);
        }
        if initial_capacity > limit {
            return Err(AllocationError::LimitExceeded { limit }.into());
        }

        let mut records = Vec::new();
        records
            .try_reserve_exact(initial_capacity)
            .map_err(AllocationError::from)?;

        Ok(Self {
            records,
            capacity: initial_capacity,
            limit,
        })
    }

    /// Take ownership of `record`.
    ///
    /// On failure nothing changes and the record is returned inside the error.
    pub fn append(&mut self, record: FileRecord) -> Result<(), AppendError> {
        if self.records.len() == self.capacity
            && let Err(e) = self.grow()
        {
            return Err(AppendError::new(record, e));
        }

        // Slots were reserved above, so this never reallocates.
        self.records.push(record);
        Ok(())
    }

    fn grow(&mut self) -> Result<(), AllocationError> {
        let target = self
            .capacity
            .checked_mul(2)
            .ok_or(AllocationError::CapacityOverflow {
                current: self.capacity,
            })?;
        if target > self.limit {
            return Err(AllocationError::LimitExceeded { limit: self.limit });
        }

        self.records
            .try_reserve_exact(target - self.records.len())?;

        debug!("[collection] grew from {} to {} slots", self.capacity, target);
        self.capacity = target;
        Ok(())
    }

    /// Drop every record past `len`. Used to undo an aborted scan.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&FileRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FileRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Release a collection and every string its records own, leaving `None`
/// behind. Tearing down `None` again does nothing.
pub fn teardown(handle: &mut Option<RecordCollection>) {
    if let Some(collection) = handle.take() {
        debug!(
            "[collection] releasing {} records ({} slots)",
            collection.len(),
            collection.capacity()
        );
        drop(collection);
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
