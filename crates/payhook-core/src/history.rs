//! Bounded, newest-first history of accepted notifications.

use std::{collections::VecDeque, sync::RwLock};

use tracing::warn;

use crate::models::NotificationRecord;

/// Number of notifications kept when no capacity is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Fixed-capacity record of recent notifications.
///
/// Insert-and-evict runs under one write lock, so the buffer never holds
/// more than `capacity` records and readers never observe a half-applied
/// insert.
#[derive(Debug)]
pub struct HistoryBuffer {
    capacity: usize,
    entries: RwLock<VecDeque<NotificationRecord>>,
}

impl HistoryBuffer {
    /// Creates an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, entries: RwLock::new(VecDeque::with_capacity(capacity + 1)) }
    }

    /// Maximum number of records retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts a record at the front, returning the evicted tail if any.
    ///
    /// A lock poisoned by a panicking writer is recovered: insert-and-evict
    /// never leaves the deque half-updated.
    pub fn push(&self, record: NotificationRecord) -> Option<NotificationRecord> {
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| {
            warn!("Recovering notification history lock poisoned by a panicked writer");
            self.entries.clear_poison();
            poisoned.into_inner()
        });

        entries.push_front(record);
        if entries.len() > self.capacity {
            entries.pop_back()
        } else {
            None
        }
    }

    /// Returns a consistent snapshot of the history, newest first.
    pub fn snapshot(&self) -> Vec<NotificationRecord> {
        let entries = self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.iter().cloned().collect()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    /// Whether no notification has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
