// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Configuration of a single simulation run.

use serde::{Deserialize, Serialize};

use crate::invalid_config;
use crate::issue_queue::ScanOutcome;
use crate::latency::LatencyRange;
use crate::types::{SimResult, check_probability};

/// Relative (dimensionless) energy weights.
///
/// Comparisons are cheap, moving operands to the functional units is
/// expensive and the clock tree plus leakage is paid every cycle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerWeights {
    /// Cost of examining one queue position (ready-bit / tag compare).
    pub scan_unit: f64,

    /// Cost of issuing one instruction (register read and dispatch).
    pub issue_op: f64,

    /// Baseline cost paid every cycle.
    pub leakage: f64,
}

impl Default for PowerWeights {
    fn default() -> Self {
        Self {
            scan_unit: 1.0,
            issue_op: 8.0,
            leakage: 5.0,
        }
    }
}

impl PowerWeights {
    /// Power of one cycle given what its scan found.
    pub fn cycle_power(&self, scan: &ScanOutcome) -> f64 {
        let mut power = self.leakage + scan.scanned as f64 * self.scan_unit;
        if scan.ready_index.is_some() {
            power += self.issue_op;
        }
        power
    }

    pub fn validate(&self) -> SimResult {
        for (name, value) in [("scan_unit", self.scan_unit), ("issue_op", self.issue_op)] {
            if !value.is_finite() || value < 0.0 {
                return invalid_config!("power weight {name} must be finite and >= 0, got {value}");
            }
        }
        if !self.leakage.is_finite() || self.leakage <= 0.0 {
            return invalid_config!(
                "power weight leakage must be finite and > 0, got {}",
                self.leakage
            );
        }
        Ok(())
    }
}

/// Everything needed to run one simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Scan up to `scan_depth + 1` positions from the head each cycle.
    pub scan_depth: usize,

    /// Total cycles simulated, warmup included.
    pub cycles: u64,

    /// Cycles at the start of the run excluded from the issue rate.
    pub warmup: u64,

    /// Number of entries held in the queue.
    pub queue_len: usize,

    /// Probability that a fresh entry is ready, given it is not a miss.
    pub p_ready: f64,

    /// Probability that an entry repeats the state of its predecessor.
    pub stickiness: f64,

    /// Probability that a fresh entry is a long-latency miss.
    pub p_miss: f64,

    pub short_latency: LatencyRange,
    pub long_latency: LatencyRange,
    pub power: PowerWeights,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            scan_depth: 4,
            cycles: 20_000,
            warmup: 2_000,
            queue_len: 16,
            p_ready: 0.5,
            stickiness: 0.85,
            p_miss: 0.10,
            short_latency: LatencyRange::new(1, 4),
            long_latency: LatencyRange::new(12, 40),
            power: PowerWeights::default(),
        }
    }
}

impl SimulationParameters {
    /// Reject any configuration that cannot produce a well-defined result.
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
        if self.cycles <= self.warmup {
            return invalid_config!(
                "cycles ({}) must exceed warmup ({}) to leave measured cycles",
                self.cycles,
                self.warmup
            );
        }
        check_probability("p_ready", self.p_ready)?;
        check_probability("stickiness", self.stickiness)?;
        check_probability("p_miss", self.p_miss)?;
        self.short_latency.validate("short")?;
        self.long_latency.validate("long")?;
        self.power.validate()
    }

    /// Number of queue positions examined in a cycle that finds nothing ready.
    pub fn scan_width(&self) -> usize {
        self.queue_len.min(self.scan_depth + 1)
    }

    pub fn measured_cycles(&self) -> u64 {
        self.cycles.saturating_sub(self.warmup)
    }

    pub fn with_scan_depth(&self, scan_depth: usize) -> Self {
        Self {
            scan_depth,
            ..self.clone()
        }
    }
}
