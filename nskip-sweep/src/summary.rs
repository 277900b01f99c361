// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Per workload point summaries of a sweep.

use std::collections::BTreeMap;

use nskip_model::empty_samples;
use nskip_model::simulator::SimulationResult;
use nskip_model::types::SimResult;
use serde::{Deserialize, Serialize};

use crate::plan::{SweepPlan, WorkloadPoint};
use crate::stats::{MeanStdev, best_choice, most_common, rank_includes, reduce};

/// The result of one simulation run and the coordinates that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepSample {
    pub point: WorkloadPoint,
    pub scan_depth: usize,
    pub seed: u64,
    pub result: SimulationResult,
}

/// Statistics across seeds for one scan depth.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthSummary {
    pub scan_depth: usize,
    pub perf_per_watt: MeanStdev,
    pub issue_rate: MeanStdev,
    pub avg_power: MeanStdev,

    /// Number of seeds for which this depth had the best perf/watt.
    pub best_count: usize,
}

/// Statistics across seeds and scan depths for one workload point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub point: WorkloadPoint,
    pub depths: Vec<DepthSummary>,

    /// Depth with the best mean perf/watt.
    pub best_scan_depth: usize,
    pub best_perf_per_watt: f64,

    pub reference_scan_depth: usize,
    pub reference_perf_per_watt: f64,

    /// `best_perf_per_watt - reference_perf_per_watt`, never negative.
    pub regret: f64,

    /// Seeds for which the reference depth was the best.
    pub reference_best_hits: usize,

    /// Seeds for which the reference depth was within the top `top_k`.
    pub reference_top_k_hits: usize,
    pub top_k: usize,

    pub num_seeds: usize,
}

impl SummaryRow {
    /// Reduce all the samples of one workload point.
    pub fn from_samples(
        point: WorkloadPoint,
        samples: &[SweepSample],
        plan: &SweepPlan,
    ) -> SimResult<Self> {
        let mut scores_by_seed: BTreeMap<u64, BTreeMap<usize, f64>> = BTreeMap::new();
        let mut results_by_depth: BTreeMap<usize, Vec<SimulationResult>> = BTreeMap::new();
        for sample in samples.iter().filter(|s| s.point == point) {
            scores_by_seed
                .entry(sample.seed)
                .or_default()
                .insert(sample.scan_depth, sample.result.perf_per_watt);
            results_by_depth
                .entry(sample.scan_depth)
                .or_default()
                .push(sample.result);
        }

        let mut best_counts: BTreeMap<usize, usize> = BTreeMap::new();
        let mut reference_best_hits = 0;
        let mut reference_top_k_hits = 0;
        for scores in scores_by_seed.values() {
            let best = best_choice(scores)?;
            *best_counts.entry(best).or_default() += 1;
            if best == plan.reference_scan_depth {
                reference_best_hits += 1;
            }
            if rank_includes(plan.reference_scan_depth, scores, plan.top_k) {
                reference_top_k_hits += 1;
            }
        }

        let mut depths = Vec::new();
        let mut mean_by_depth = BTreeMap::new();
        for scan_depth in plan.scan_depths() {
            let Some(results) = results_by_depth.get(&scan_depth) else {
                return empty_samples!("no samples for N={scan_depth} at {point}");
            };
            let perf_per_watt = reduce(&collect(results, |r| r.perf_per_watt))?;
            let issue_rate = reduce(&collect(results, |r| r.issue_rate))?;
            let avg_power = reduce(&collect(results, |r| r.avg_power))?;
            mean_by_depth.insert(scan_depth, perf_per_watt.mean);
            depths.push(DepthSummary {
                scan_depth,
                perf_per_watt,
                issue_rate,
                avg_power,
                best_count: best_counts.get(&scan_depth).copied().unwrap_or(0),
            });
        }

        let best_scan_depth = best_choice(&mean_by_depth)?;
        let best_perf_per_watt = mean_by_depth[&best_scan_depth];
        let Some(reference_perf_per_watt) = mean_by_depth.get(&plan.reference_scan_depth).copied()
        else {
            return empty_samples!(
                "no samples for reference N={} at {point}",
                plan.reference_scan_depth
            );
        };

        Ok(Self {
            point,
            depths,
            best_scan_depth,
            best_perf_per_watt,
            reference_scan_depth: plan.reference_scan_depth,
            reference_perf_per_watt,
            regret: best_perf_per_watt - reference_perf_per_watt,
            reference_best_hits,
            reference_top_k_hits,
            top_k: plan.top_k,
            num_seeds: scores_by_seed.len(),
        })
    }

    pub fn depth(&self, scan_depth: usize) -> Option<&DepthSummary> {
        self.depths.iter().find(|d| d.scan_depth == scan_depth)
    }

    /// Mean perf/watt at `scan_depth`.
    pub fn snapshot(&self, scan_depth: usize) -> Option<f64> {
        self.depth(scan_depth).map(|d| d.perf_per_watt.mean)
    }

    /// The `n` depths most often best for an individual seed.
    pub fn most_common_best(&self, n: usize) -> Vec<(usize, usize)> {
        let counts: BTreeMap<usize, usize> = self
            .depths
            .iter()
            .map(|d| (d.scan_depth, d.best_count))
            .collect();
        most_common(&counts, n)
    }
}

pub(crate) fn collect(
    results: &[SimulationResult],
    field: impl Fn(&SimulationResult) -> f64,
) -> Vec<f64> {
    results.iter().map(field).collect()
}
