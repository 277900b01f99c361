// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Cycle-stepped simulation of one issue queue under an N-skip policy.
//!
//! Every cycle the issue logic scans at most `N + 1` positions from the head
//! and stops at the first ready entry (early-out). At most one entry issues
//! per cycle. An issued entry is removed and replaced by exactly one new entry
//! at the tail, so the queue length never changes.
//!
//! Power is additive: leakage every cycle, plus one scan unit per examined
//! position, plus the issue cost when an entry issues.
//!
//! Note the two denominators: the issue rate only counts cycles after the
//! warmup, while the average power is taken over every simulated cycle.
//!
//! ```rust
//! use nskip_model::params::SimulationParameters;
//! use nskip_model::simulator::run_seeded;
//!
//! let params = SimulationParameters {
//!     cycles: 1_000,
//!     warmup: 100,
//!     ..SimulationParameters::default()
//! };
//! let result = run_seeded(&params, 7).unwrap();
//! assert!((0.0..=1.0).contains(&result.issue_rate));
//! ```

use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::issue_queue::IssueQueue;
use crate::latency::LatencyModel;
use crate::params::SimulationParameters;
use crate::state::StateSampler;
use crate::types::{Cycle, SimResult};

/// The seedable generator used for every run.
pub type SimRng = Xoshiro256PlusPlus;

/// Create the generator for a run from its seed.
#[must_use]
pub fn seeded_rng(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}

/// Aggregate rates of one run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Issues per measured cycle.
    pub issue_rate: f64,

    /// Relative power per cycle, averaged over all cycles.
    pub avg_power: f64,

    pub perf_per_watt: f64,
}

/// What happened in a single cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CycleRecord {
    pub cycle: Cycle,
    pub scanned: usize,
    pub issued_from: Option<usize>,
    pub power: f64,
}

impl CycleRecord {
    pub fn issued(&self) -> bool {
        self.issued_from.is_some()
    }
}

pub struct IssueQueueSimulator<'a, R: Rng> {
    params: &'a SimulationParameters,
    rng: R,
    sampler: StateSampler,
    latency_model: LatencyModel,
    queue: IssueQueue,
    scan_width: usize,
    cycle: Cycle,
    total_power: f64,
    measured_issues: u64,
}

impl<'a, R: Rng> IssueQueueSimulator<'a, R> {
    /// Validate `params` and fill the queue as if it were already populated
    /// at cycle 0.
    pub fn new(params: &'a SimulationParameters, rng: R) -> SimResult<Self> {
        params.validate()?;

        let mut sim = Self {
            params,
            rng,
            sampler: StateSampler::new(params.stickiness, params.p_ready, params.p_miss),
            latency_model: LatencyModel::new(params.short_latency, params.long_latency),
            queue: IssueQueue::with_capacity(params.queue_len),
            scan_width: params.scan_width(),
            cycle: 0,
            total_power: 0.0,
            measured_issues: 0,
        };
        for _ in 0..params.queue_len {
            sim.create_entry(0);
        }
        Ok(sim)
    }

    fn create_entry(&mut self, created_at: Cycle) {
        let state = self.sampler.sample(&mut self.rng);
        let latency = self.latency_model.latency(state, &mut self.rng);
        self.queue.push(created_at + latency);
    }

    /// Has every configured cycle been simulated?
    pub fn done(&self) -> bool {
        self.cycle >= self.params.cycles
    }

    pub fn queue(&self) -> &IssueQueue {
        &self.queue
    }

    /// The next cycle to be simulated.
    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// Simulate one cycle.
    pub fn step(&mut self) -> CycleRecord {
        let t = self.cycle;
        let params = self.params;

        let scan = self.queue.scan(t, self.scan_width);
        let cycle_power = params.power.cycle_power(&scan);

        if let Some(index) = scan.ready_index {
            self.queue.remove(index);
            self.create_entry(t);
            trace!("cycle {t}: issued from position {index}");

            if t >= params.warmup {
                self.measured_issues += 1;
            }
        }

        self.total_power += cycle_power;
        self.cycle += 1;

        CycleRecord {
            cycle: t,
            scanned: scan.scanned,
            issued_from: scan.ready_index,
            power: cycle_power,
        }
    }

    /// Reduce the run to its aggregate rates. Any cycles not yet stepped are
    /// simulated first.
    pub fn finish(mut self) -> SimulationResult {
        while !self.done() {
            self.step();
        }

        let issue_rate = self.measured_issues as f64 / self.params.measured_cycles() as f64;
        let avg_power = self.total_power / self.params.cycles as f64;
        let perf_per_watt = issue_rate / avg_power;

        debug!(
            "N={} p_ready={} stickiness={} p_miss={}: issue rate {issue_rate:.4}, power {avg_power:.3}, perf/watt {perf_per_watt:.5}",
            self.params.scan_depth, self.params.p_ready, self.params.stickiness, self.params.p_miss,
        );

        SimulationResult {
            issue_rate,
            avg_power,
            perf_per_watt,
        }
    }
}

/// Run a full simulation drawing from `rng`.
pub fn run<R: Rng>(params: &SimulationParameters, rng: &mut R) -> SimResult<SimulationResult> {
    let sim = IssueQueueSimulator::new(params, rng)?;
    Ok(sim.finish())
}

/// Run a full simulation with a generator freshly seeded from `seed`.
pub fn run_seeded(params: &SimulationParameters, seed: u64) -> SimResult<SimulationResult> {
    let sim = IssueQueueSimulator::new(params, seeded_rng(seed))?;
    Ok(sim.finish())
}
