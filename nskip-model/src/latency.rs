// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Map an [EntryState] to the number of cycles before the entry is ready.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::invalid_config;
use crate::state::EntryState;
use crate::types::SimResult;

/// An inclusive range of cycle delays.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyRange {
    pub min: u64,
    pub max: u64,
}

impl LatencyRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, name: &str) -> SimResult {
        if self.min > self.max {
            return invalid_config!(
                "{name} latency range is empty ({} > {})",
                self.min,
                self.max
            );
        }
        Ok(())
    }

    /// Draw uniformly from the range, both ends included.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.min..=self.max)
    }
}

impl fmt::Display for LatencyRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Draw the latency of an entry in the given state.
pub fn latency<R: Rng + ?Sized>(
    state: EntryState,
    short_range: &LatencyRange,
    long_range: &LatencyRange,
    rng: &mut R,
) -> u64 {
    match state {
        EntryState::Ready => 0,
        EntryState::ShortLatency => short_range.sample(rng),
        EntryState::LongLatency => long_range.sample(rng),
    }
}

/// The per-state delay distributions of one run.
#[derive(Copy, Clone, Debug)]
pub struct LatencyModel {
    short: LatencyRange,
    long: LatencyRange,
}

impl LatencyModel {
    pub fn new(short: LatencyRange, long: LatencyRange) -> Self {
        Self { short, long }
    }

    pub fn latency<R: Rng + ?Sized>(&self, state: EntryState, rng: &mut R) -> u64 {
        latency(state, &self.short, &self.long, rng)
    }
}
