//! Fixed-capacity jump sample memory.

use std::collections::VecDeque;

use dolphin_run_core::JumpSample;

/// Ordered ring of the most recent jump samples.
///
/// The capacity is part of the type; pushing into a full memory evicts the
/// oldest sample.
#[derive(Clone, Debug)]
pub struct JumpMemory<const CAPACITY: usize> {
    samples: VecDeque<JumpSample>,
}

impl<const CAPACITY: usize> JumpMemory<CAPACITY> {
    /// Creates an empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(CAPACITY),
        }
    }

    /// Appends a sample, returning the evicted one when the memory was full.
    pub fn push(&mut self, sample: JumpSample) -> Option<JumpSample> {
        if CAPACITY == 0 {
            return Some(sample);
        }
        let evicted = if self.samples.len() == CAPACITY {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Samples in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &JumpSample> {
        self.samples.iter()
    }

    /// Number of stored samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Reports whether no sample has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Copies the stored samples into a vector, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<JumpSample> {
        self.samples.iter().copied().collect()
    }
}

impl<const CAPACITY: usize> Default for JumpMemory<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}
