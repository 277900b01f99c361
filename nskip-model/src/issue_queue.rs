// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The issue queue: an ordered window of pending instructions.
//!
//! Each entry is reduced to the cycle at which it becomes issuable. Position
//! 0 is the head and has the highest issue priority.
//!
//! ```text
//!   head                                  tail
//!  +-----+-----+-----+-----+- - - -+-----+
//!  |  0  |  1  |  2  | ... |       | L-1 |  <- refill appended here
//!  +-----+-----+-----+-----+- - - -+-----+
//!  <---- scan N+1 ---->
//! ```

use std::collections::VecDeque;

use crate::types::Cycle;

/// Outcome of scanning the head of the queue in one cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Number of positions examined (each one costs scan energy).
    pub scanned: usize,

    /// Position of the first ready entry, if one was found.
    pub ready_index: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct IssueQueue {
    ready_times: VecDeque<Cycle>,
}

impl IssueQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ready_times: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.ready_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready_times.is_empty()
    }

    pub fn clear(&mut self) {
        self.ready_times.clear();
    }

    /// Append an entry at the tail.
    pub fn push(&mut self, ready_time: Cycle) {
        self.ready_times.push_back(ready_time);
    }

    /// Examine up to `scan_width` positions from the head, stopping at the
    /// first entry that is ready at cycle `now`.
    pub fn scan(&self, now: Cycle, scan_width: usize) -> ScanOutcome {
        let limit = scan_width.min(self.ready_times.len());
        let mut scanned = 0;
        for (i, ready_time) in self.ready_times.iter().take(limit).enumerate() {
            scanned += 1;
            if *ready_time <= now {
                return ScanOutcome {
                    scanned,
                    ready_index: Some(i),
                };
            }
        }
        ScanOutcome {
            scanned,
            ready_index: None,
        }
    }

    /// Remove the entry at `index`, closing the gap so that younger entries
    /// keep their relative order.
    pub fn remove(&mut self, index: usize) -> Option<Cycle> {
        self.ready_times.remove(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cycle> {
        self.ready_times.iter()
    }
}
