//! Bounded per-patient sample window
//!
//! Append-only FIFO sequence of the most recent samples. Insertion order is
//! arrival order, not timestamp order: a late sample delivered after
//! reconnection lands at the back of the window. Eviction removes the oldest
//! entry once the capacity is exceeded.

use crate::domain::sample::Sample;
use serde::Serialize;
use std::collections::VecDeque;

/// Default window capacity, in samples
pub const DEFAULT_WINDOW_CAPACITY: usize = 120;

/// Bounded, ordered sequence of the most recent samples for one patient
#[derive(Debug, Clone, Serialize)]
pub struct VitalsWindow {
    #[serde(skip)]
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl VitalsWindow {
    /// Creates an empty window holding at most `capacity` samples
    ///
    /// A zero capacity is treated as 1 so `latest()` stays meaningful.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a sample, evicting the oldest entry past capacity
    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Returns the most recently appended sample
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the window holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples this window retains
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates samples oldest-first
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}
