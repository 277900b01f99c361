// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Readiness state of newly created queue entries.
//!
//! Every entry that enters the issue queue is first given a generative
//! [EntryState] which decides how its latency is drawn. Consecutive entries
//! are correlated: with probability `stickiness` an entry repeats the state of
//! the entry created just before it, which models bursts of dependent (or
//! independent) instructions.
//!
//! The correlation context is a single value per simulation run. It is
//! threaded through the initial fill of the queue and through every refill in
//! creation order, not kept per queue slot.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Generative latency class of a queue entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryState {
    /// Issuable in the cycle it is created.
    Ready,

    /// Waiting on a short-latency producer.
    ShortLatency,

    /// Waiting on a long-latency (miss-like) producer.
    LongLatency,
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntryState::Ready => write!(f, "ready"),
            EntryState::ShortLatency => write!(f, "short"),
            EntryState::LongLatency => write!(f, "long"),
        }
    }
}

/// Draw a state with no correlation context.
///
/// `p_miss` is tested first, so `p_ready` is the probability of being ready
/// given that the entry is not a miss.
pub fn fresh_state<R: Rng + ?Sized>(p_ready: f64, p_miss: f64, rng: &mut R) -> EntryState {
    if rng.gen_bool(p_miss) {
        return EntryState::LongLatency;
    }
    if rng.gen_bool(p_ready) {
        EntryState::Ready
    } else {
        EntryState::ShortLatency
    }
}

/// Produce the state of the next entry given the state of the previous one.
///
/// Probabilities are expected to have been validated to lie in `[0, 1]`.
pub fn next_state<R: Rng + ?Sized>(
    previous: Option<EntryState>,
    stickiness: f64,
    p_ready: f64,
    p_miss: f64,
    rng: &mut R,
) -> EntryState {
    match previous {
        None => fresh_state(p_ready, p_miss, rng),
        Some(previous) => {
            if rng.gen_bool(stickiness) {
                previous
            } else {
                fresh_state(p_ready, p_miss, rng)
            }
        }
    }
}

/// Holds the per-run correlation variable and advances it on every entry
/// creation.
#[derive(Clone, Debug)]
pub struct StateSampler {
    stickiness: f64,
    p_ready: f64,
    p_miss: f64,
    previous: Option<EntryState>,
}

impl StateSampler {
    pub fn new(stickiness: f64, p_ready: f64, p_miss: f64) -> Self {
        Self {
            stickiness,
            p_ready,
            p_miss,
            previous: None,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EntryState {
        let state = next_state(
            self.previous,
            self.stickiness,
            self.p_ready,
            self.p_miss,
            rng,
        );
        self.previous = Some(state);
        state
    }

    /// The state of the most recently created entry, if any.
    pub fn previous(&self) -> Option<EntryState> {
        self.previous
    }
}
