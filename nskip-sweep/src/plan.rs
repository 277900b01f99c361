// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! What a sweep covers: the workload grid, the seeds and the scan depths.

use std::fmt;
use std::ops::RangeInclusive;

use itertools::iproduct;
use nskip_model::invalid_config;
use nskip_model::params::SimulationParameters;
use nskip_model::types::{SimResult, check_probability};
use serde::{Deserialize, Serialize};

/// One (p_ready, stickiness, p_miss) coordinate of the grid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkloadPoint {
    pub p_ready: f64,
    pub stickiness: f64,
    pub p_miss: f64,
}

impl WorkloadPoint {
    pub fn new(p_ready: f64, stickiness: f64, p_miss: f64) -> Self {
        Self {
            p_ready,
            stickiness,
            p_miss,
        }
    }

    /// Build the parameters of a single run at this point.
    #[must_use]
    pub fn apply(&self, base: &SimulationParameters, scan_depth: usize) -> SimulationParameters {
        SimulationParameters {
            scan_depth,
            p_ready: self.p_ready,
            stickiness: self.stickiness,
            p_miss: self.p_miss,
            ..base.clone()
        }
    }
}

impl fmt::Display for WorkloadPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "p_ready={} stickiness={} p_miss={}",
            self.p_ready, self.stickiness, self.p_miss
        )
    }
}

/// Cartesian grid of workload dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    pub p_ready: Vec<f64>,
    pub stickiness: Vec<f64>,
    pub p_miss: Vec<f64>,
}

impl SweepGrid {
    pub fn new(p_ready: Vec<f64>, stickiness: Vec<f64>, p_miss: Vec<f64>) -> Self {
        Self {
            p_ready,
            stickiness,
            p_miss,
        }
    }

    /// A grid that only varies `p_ready`.
    pub fn p_ready_only(p_ready: Vec<f64>, stickiness: f64, p_miss: f64) -> Self {
        Self::new(p_ready, vec![stickiness], vec![p_miss])
    }

    /// All points, `p_ready` outermost and `p_miss` innermost.
    pub fn points(&self) -> Vec<WorkloadPoint> {
        iproduct!(&self.p_ready, &self.stickiness, &self.p_miss)
            .map(|(p_ready, stickiness, p_miss)| WorkloadPoint::new(*p_ready, *stickiness, *p_miss))
            .collect()
    }

    pub fn num_points(&self) -> usize {
        self.p_ready.len() * self.stickiness.len() * self.p_miss.len()
    }

    pub fn validate(&self) -> SimResult {
        for (name, values) in [
            ("p_ready", &self.p_ready),
            ("stickiness", &self.stickiness),
            ("p_miss", &self.p_miss),
        ] {
            if values.is_empty() {
                return invalid_config!("grid dimension {name} has no values");
            }
            for value in values {
                check_probability(name, *value)?;
            }
        }
        Ok(())
    }
}

/// Everything a [SweepRunner](crate::runner::SweepRunner) needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    /// Fixed architectural constants. Its workload probabilities and scan
    /// depth are replaced for every run.
    pub base: SimulationParameters,

    pub grid: SweepGrid,
    pub seeds: Vec<u64>,

    /// Every depth in `0..=max_scan_depth` is simulated.
    pub max_scan_depth: usize,

    /// The static default the best depth is compared against.
    pub reference_scan_depth: usize,

    /// Rank within which the reference depth counts as a top-k hit.
    pub top_k: usize,

    /// Depths whose mean perf/watt is reported alongside the best.
    pub snapshot_depths: Vec<usize>,
}

impl SweepPlan {
    pub fn new(base: SimulationParameters, grid: SweepGrid, seeds: Vec<u64>) -> Self {
        Self {
            base,
            grid,
            seeds,
            max_scan_depth: 8,
            reference_scan_depth: 4,
            top_k: 2,
            snapshot_depths: vec![0, 2, 4, 6, 8],
        }
    }

    pub fn scan_depths(&self) -> RangeInclusive<usize> {
        0..=self.max_scan_depth
    }

    /// Number of simulation runs the plan requires.
    pub fn num_runs(&self) -> usize {
        self.grid.num_points() * self.seeds.len() * (self.max_scan_depth + 1)
    }

    /// Check the whole plan before any simulation is started.
    pub fn validate(&self) -> SimResult {
        self.grid.validate()?;
        if self.seeds.is_empty() {
            return invalid_config!("no seeds given");
        }
        check_unique_seeds(&self.seeds)?;
        if self.top_k == 0 {
            return invalid_config!("top_k must be >= 1");
        }
        if self.reference_scan_depth > self.max_scan_depth {
            return invalid_config!(
                "reference scan depth {} exceeds maximum scan depth {}",
                self.reference_scan_depth,
                self.max_scan_depth
            );
        }
        if let Some(depth) = self
            .snapshot_depths
            .iter()
            .find(|depth| **depth > self.max_scan_depth)
        {
            return invalid_config!(
                "snapshot scan depth {depth} exceeds maximum scan depth {}",
                self.max_scan_depth
            );
        }

        // The deepest run at every point covers all per-run checks
        for point in self.grid.points() {
            point.apply(&self.base, self.max_scan_depth).validate()?;
        }
        Ok(())
    }
}

/// Results are keyed by seed, so a repeated seed would be counted once.
pub fn check_unique_seeds(seeds: &[u64]) -> SimResult {
    for (i, seed) in seeds.iter().enumerate() {
        if seeds[..i].contains(seed) {
            return invalid_config!("seed {seed} given more than once");
        }
    }
    Ok(())
}
