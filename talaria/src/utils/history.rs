use std::collections::VecDeque;
use std::time::SystemTime;

/// Default number of entries a device keeps about its own past values.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// A single recorded value together with the wall-clock time it was recorded at.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry<T> {
    pub at: SystemTime,
    pub value: T,
}

/// Fixed-capacity ring buffer of timestamped values.
///
/// Devices use it to keep a bounded trail of the values they rendered: pushing
/// beyond capacity evicts the oldest entry.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct History<T> {
    capacity: usize,
    entries: VecDeque<HistoryEntry<T>>,
}

impl<T> History<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Records a value, stamped with the current time.
    pub fn push(&mut self, value: T) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            at: SystemTime::now(),
            value,
        });
    }

    /// The most recently recorded entry, if any.
    pub fn last(&self) -> Option<&HistoryEntry<T>> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.entries.iter()
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
