// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Study of the memoryless Bernoulli baseline.
//!
//! For every `p_ready` and every depth `0..=max_scan_depth` the baseline is
//! run once per seed, and each depth is reduced to the mean and spread of its
//! rates. The best depth is the one with the highest mean perf/watt.

use std::collections::BTreeMap;

use log::info;
use nskip_model::bernoulli::{BernoulliParameters, run_bernoulli_seeded};
use nskip_model::invalid_config;
use nskip_model::simulator::SimulationResult;
use nskip_model::types::{SimResult, check_probability};
use serde::{Deserialize, Serialize};

use crate::plan::check_unique_seeds;
use crate::stats::{MeanStdev, best_choice, reduce};
use crate::summary::collect;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselinePlan {
    /// Trial count, queue length and power weights shared by every run.
    pub base: BernoulliParameters,

    pub p_ready: Vec<f64>,
    pub seeds: Vec<u64>,
    pub max_scan_depth: usize,
}

impl BaselinePlan {
    pub fn new(base: BernoulliParameters, p_ready: Vec<f64>, seeds: Vec<u64>) -> Self {
        Self {
            base,
            p_ready,
            seeds,
            max_scan_depth: 8,
        }
    }

    pub fn num_runs(&self) -> usize {
        self.p_ready.len() * self.seeds.len() * (self.max_scan_depth + 1)
    }

    fn params(&self, p_ready: f64, scan_depth: usize) -> BernoulliParameters {
        BernoulliParameters {
            scan_depth,
            p_ready,
            ..self.base.clone()
        }
    }

    pub fn validate(&self) -> SimResult {
        if self.p_ready.is_empty() {
            return invalid_config!("baseline has no p_ready values");
        }
        for p_ready in &self.p_ready {
            check_probability("p_ready", *p_ready)?;
        }
        if self.seeds.is_empty() {
            return invalid_config!("no seeds given");
        }
        check_unique_seeds(&self.seeds)?;
        for p_ready in &self.p_ready {
            self.params(*p_ready, self.max_scan_depth).validate()?;
        }
        Ok(())
    }
}

/// Rates of one depth across seeds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselineDepth {
    pub scan_depth: usize,
    pub issue_rate: MeanStdev,
    pub avg_power: MeanStdev,
    pub perf_per_watt: MeanStdev,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselineRow {
    pub p_ready: f64,
    pub depths: Vec<BaselineDepth>,
    pub best_scan_depth: usize,
    pub num_seeds: usize,
}

impl BaselineRow {
    pub fn best(&self) -> Option<&BaselineDepth> {
        self.depths
            .iter()
            .find(|d| d.scan_depth == self.best_scan_depth)
    }
}

/// Run the baseline at every `p_ready` of the plan.
pub fn run_baseline(plan: &BaselinePlan) -> SimResult<Vec<BaselineRow>> {
    plan.validate()?;

    let mut rows = Vec::with_capacity(plan.p_ready.len());
    for p_ready in &plan.p_ready {
        let mut depths = Vec::with_capacity(plan.max_scan_depth + 1);
        let mut means = BTreeMap::new();
        for scan_depth in 0..=plan.max_scan_depth {
            let params = plan.params(*p_ready, scan_depth);
            let results = plan
                .seeds
                .iter()
                .map(|seed| run_bernoulli_seeded(&params, *seed))
                .collect::<SimResult<Vec<SimulationResult>>>()?;

            let depth = BaselineDepth {
                scan_depth,
                issue_rate: reduce(&collect(&results, |r| r.issue_rate))?,
                avg_power: reduce(&collect(&results, |r| r.avg_power))?,
                perf_per_watt: reduce(&collect(&results, |r| r.perf_per_watt))?,
            };
            means.insert(scan_depth, depth.perf_per_watt.mean);
            depths.push(depth);
        }

        let best_scan_depth = best_choice(&means)?;
        info!("baseline p_ready={p_ready}: best N={best_scan_depth}");
        rows.push(BaselineRow {
            p_ready: *p_ready,
            depths,
            best_scan_depth,
            num_seeds: plan.seeds.len(),
        });
    }
    Ok(rows)
}
