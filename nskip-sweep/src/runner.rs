// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Run a [SweepPlan] and collect every sample.
//!
//! The generator is re-seeded from the sample's seed before every single
//! run, so a (point, seed, depth) coordinate always yields the same result
//! regardless of the order runs are made in, and every depth at a point sees
//! the same random stream for a given seed.
//!
//! A configuration error aborts the whole sweep. No cell is skipped.

use log::info;
use nskip_model::simulator::run_seeded;
use nskip_model::types::SimResult;

use crate::plan::{SweepPlan, WorkloadPoint};
use crate::summary::{SummaryRow, SweepSample};

/// Receives progress notifications while a sweep runs.
pub trait SweepObserver {
    fn run_complete(&mut self, _sample: &SweepSample) {}
    fn point_complete(&mut self, _row: &SummaryRow) {}
}

/// An observer that ignores everything.
pub struct Silent;

impl SweepObserver for Silent {}

/// All samples of a sweep and the summary row of each workload point.
#[derive(Clone, Debug, Default)]
pub struct SweepOutcome {
    pub samples: Vec<SweepSample>,
    pub rows: Vec<SummaryRow>,
}

impl SweepOutcome {
    /// Rows sharing the given `p_ready`, in grid order.
    pub fn rows_for_p_ready(&self, p_ready: f64) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().filter(move |r| r.point.p_ready == p_ready)
    }
}

pub struct SweepRunner {
    plan: SweepPlan,
}

impl SweepRunner {
    /// Validate the plan up front so a bad configuration fails before any
    /// time is spent simulating.
    pub fn new(plan: SweepPlan) -> SimResult<Self> {
        plan.validate()?;
        Ok(Self { plan })
    }

    pub fn plan(&self) -> &SweepPlan {
        &self.plan
    }

    /// Simulate every seed and depth at one point.
    pub fn run_point(
        &self,
        point: &WorkloadPoint,
        observer: &mut dyn SweepObserver,
    ) -> SimResult<Vec<SweepSample>> {
        let mut samples = Vec::with_capacity(self.plan.seeds.len() * self.plan.scan_depths().count());
        for seed in &self.plan.seeds {
            for scan_depth in self.plan.scan_depths() {
                let params = point.apply(&self.plan.base, scan_depth);
                let result = run_seeded(&params, *seed)?;
                let sample = SweepSample {
                    point: *point,
                    scan_depth,
                    seed: *seed,
                    result,
                };
                observer.run_complete(&sample);
                samples.push(sample);
            }
        }
        Ok(samples)
    }

    pub fn run(&self, observer: &mut dyn SweepObserver) -> SimResult<SweepOutcome> {
        let mut outcome = SweepOutcome::default();
        for point in self.plan.grid.points() {
            let samples = self.run_point(&point, observer)?;
            let row = SummaryRow::from_samples(point, &samples, &self.plan)?;
            info!(
                "{point}: best N={} (perf/watt {:.5}), N={} regret {:.5}",
                row.best_scan_depth,
                row.best_perf_per_watt,
                row.reference_scan_depth,
                row.regret
            );
            observer.point_complete(&row);
            outcome.samples.extend(samples);
            outcome.rows.push(row);
        }
        Ok(outcome)
    }
}
