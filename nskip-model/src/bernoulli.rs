// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Memoryless baseline of the N-skip policy.
//!
//! Each trial draws a fresh queue in which every entry is independently
//! ready with probability `p_ready`, then performs a single early-out scan
//! of it. There are no latencies, no correlation between entries and no
//! refill, so trials are independent and the expected issue rate at depth N
//! is `1 - (1 - p_ready)^(N + 1)`.
//!
//! Scanning and power accounting are shared with the cycle-stepped
//! [simulator](crate::simulator), so the two models differ only in how the
//! queue contents are produced.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::invalid_config;
use crate::issue_queue::IssueQueue;
use crate::params::PowerWeights;
use crate::simulator::{SimulationResult, seeded_rng};
use crate::types::{Cycle, SimResult, check_probability};

/// Ready time of an entry that never becomes ready within its trial.
const NEVER_READY: Cycle = Cycle::MAX;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BernoulliParameters {
    /// Scan up to `scan_depth + 1` positions from the head.
    pub scan_depth: usize,

    /// Number of independent single-cycle trials.
    pub trials: u64,

    pub queue_len: usize,

    /// Probability that each entry is ready.
    pub p_ready: f64,

    pub power: PowerWeights,
}

impl Default for BernoulliParameters {
    fn default() -> Self {
        Self {
            scan_depth: 4,
            trials: 5_000,
            queue_len: 16,
            p_ready: 0.5,
            power: PowerWeights::default(),
        }
    }
}

impl BernoulliParameters {
    pub fn validate(&self) -> SimResult {
        if self.queue_len == 0 {
            return invalid_config!("queue_len must be > 0");
        }
        if self.scan_depth >= self.queue_len {
            return invalid_config!(
                "scan depth N={} must be within [0, {}] for a queue of {} entries",
                self.scan_depth,
                self.queue_len - 1,
                self.queue_len
            );
        }
        if self.trials == 0 {
            return invalid_config!("trials must be > 0");
        }
        check_probability("p_ready", self.p_ready)?;
        self.power.validate()
    }

    pub fn scan_width(&self) -> usize {
        self.queue_len.min(self.scan_depth + 1)
    }
}

/// Run every trial drawing from `rng`.
pub fn run_bernoulli<R: Rng + ?Sized>(
    params: &BernoulliParameters,
    rng: &mut R,
) -> SimResult<SimulationResult> {
    params.validate()?;

    let scan_width = params.scan_width();
    let mut queue = IssueQueue::with_capacity(params.queue_len);
    let mut issued: u64 = 0;
    let mut total_power = 0.0;
    for _ in 0..params.trials {
        queue.clear();
        for _ in 0..params.queue_len {
            queue.push(if rng.gen_bool(params.p_ready) {
                0
            } else {
                NEVER_READY
            });
        }

        let scan = queue.scan(0, scan_width);
        total_power += params.power.cycle_power(&scan);
        if scan.ready_index.is_some() {
            issued += 1;
        }
    }

    let issue_rate = issued as f64 / params.trials as f64;
    let avg_power = total_power / params.trials as f64;
    let perf_per_watt = issue_rate / avg_power;
    debug!(
        "baseline N={} p_ready={}: issue rate {issue_rate:.4}, power {avg_power:.3}, perf/watt {perf_per_watt:.5}",
        params.scan_depth, params.p_ready
    );

    Ok(SimulationResult {
        issue_rate,
        avg_power,
        perf_per_watt,
    })
}

/// Run every trial with a generator freshly seeded from `seed`.
pub fn run_bernoulli_seeded(
    params: &BernoulliParameters,
    seed: u64,
) -> SimResult<SimulationResult> {
    run_bernoulli(params, &mut seeded_rng(seed))
}
