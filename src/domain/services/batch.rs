//! Batch Accumulator
//!
//! Bounded buffer of validated records waiting to be flushed to the store.

use crate::domain::entities::GeoRecord;
use std::collections::HashSet;

/// Fixed-capacity batch with an in-batch duplicate index.
///
/// Invariants: `records.len() == keys.len()`, no two records share an
/// `ip_address`, and `records.len() <= capacity`. The index only covers the
/// current batch; `flush` resets it.
#[derive(Debug)]
pub struct Batch {
    capacity: usize,
    keys: HashSet<String>,
    records: Vec<GeoRecord>,
}

impl Batch {
    /// Create an empty batch holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            keys: HashSet::with_capacity(capacity),
            records: Vec::with_capacity(capacity),
        }
    }

    /// Add a record unless its key is already in this batch.
    ///
    /// Returns false, leaving the batch untouched, for a duplicate key.
    /// The first record seen for a key wins.
    pub fn try_add(&mut self, record: GeoRecord) -> bool {
        if self.is_full() || self.keys.contains(&record.ip_address) {
            return false;
        }
        self.keys.insert(record.ip_address.clone());
        self.records.push(record);
        true
    }

    /// True once the batch holds `capacity` records.
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    /// Drop all records and keys. Capacity is unchanged.
    pub fn flush(&mut self) {
        self.records.clear();
        self.keys.clear();
    }

    pub fn records(&self) -> &[GeoRecord] {
        &self.records
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

    /// Number of distinct keys currently indexed.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}
