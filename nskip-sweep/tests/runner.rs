// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use approx::assert_relative_eq;
use nskip_model::params::SimulationParameters;
use nskip_model::simulator::run_seeded;
use nskip_sweep::plan::{SweepGrid, SweepPlan, WorkloadPoint};
use nskip_sweep::runner::{Silent, SweepObserver, SweepRunner};
use nskip_sweep::summary::{SummaryRow, SweepSample};

const SEEDS: [u64; 4] = [0, 1, 2, 3];

fn short_base() -> SimulationParameters {
    SimulationParameters {
        cycles: 2_000,
        warmup: 200,
        ..SimulationParameters::default()
    }
}

fn small_plan() -> SweepPlan {
    SweepPlan::new(
        short_base(),
        SweepGrid::new(vec![0.2, 0.7], vec![0.85], vec![0.05, 0.2]),
        SEEDS.to_vec(),
    )
}

#[derive(Default)]
struct Counter {
    runs: usize,
    points: usize,
}

impl SweepObserver for Counter {
    fn run_complete(&mut self, _sample: &SweepSample) {
        self.runs += 1;
    }

    fn point_complete(&mut self, _row: &SummaryRow) {
        self.points += 1;
    }
}

#[test]
fn every_coordinate_is_simulated() {
    let plan = small_plan();
    let num_runs = plan.num_runs();
    let runner = SweepRunner::new(plan).unwrap();

    let mut counter = Counter::default();
    let outcome = runner.run(&mut counter).unwrap();

    assert_eq!(outcome.samples.len(), num_runs);
    assert_eq!(outcome.rows.len(), 4);
    assert_eq!(counter.runs, num_runs);
    assert_eq!(counter.points, 4);
    assert_eq!(outcome.rows_for_p_ready(0.2).count(), 2);
}

#[test]
fn samples_are_reproducible_per_coordinate() {
    let runner = SweepRunner::new(small_plan()).unwrap();
    let point = WorkloadPoint::new(0.7, 0.85, 0.2);
    let samples = runner.run_point(&point, &mut Silent).unwrap();

    // Each sample can be regenerated on its own from its seed
    for sample in &samples {
        let params = point.apply(&short_base(), sample.scan_depth);
        assert_eq!(run_seeded(&params, sample.seed).unwrap(), sample.result);
    }

    let again = runner.run_point(&point, &mut Silent).unwrap();
    assert_eq!(samples, again);
}

#[test]
fn summary_matches_samples() {
    let plan = small_plan();
    let runner = SweepRunner::new(plan.clone()).unwrap();
    let outcome = runner.run(&mut Silent).unwrap();

    for row in &outcome.rows {
        assert_eq!(row.num_seeds, SEEDS.len());
        assert_eq!(row.depths.len(), plan.max_scan_depth + 1);

        // The per-seed best counts cover every seed exactly once
        let total_best: usize = row.depths.iter().map(|d| d.best_count).sum();
        assert_eq!(total_best, SEEDS.len());

        // The best depth has the highest mean
        for depth in &row.depths {
            assert!(depth.perf_per_watt.mean <= row.best_perf_per_watt);
            assert_eq!(depth.perf_per_watt.count, SEEDS.len());
        }
        assert_eq!(row.snapshot(row.best_scan_depth), Some(row.best_perf_per_watt));
        assert_eq!(row.snapshot(4), Some(row.reference_perf_per_watt));
        assert_relative_eq!(row.regret, row.best_perf_per_watt - row.reference_perf_per_watt);
        assert!(row.regret >= 0.0);
        assert!(row.reference_best_hits <= row.reference_top_k_hits);
        assert!(row.reference_top_k_hits <= SEEDS.len());

        // Recompute one mean directly
        let n2: Vec<f64> = outcome
            .samples
            .iter()
            .filter(|s| s.point == row.point && s.scan_depth == 2)
            .map(|s| s.result.perf_per_watt)
            .collect();
        let mean = n2.iter().sum::<f64>() / n2.len() as f64;
        assert_relative_eq!(row.snapshot(2).unwrap(), mean);
    }
}

#[test]
fn regret_is_zero_when_reference_is_best() {
    // Every entry ready: all depths behave identically, so N=0 wins the tie
    // and a reference of 0 has no regret.
    let base = SimulationParameters {
        cycles: 200,
        warmup: 10,
        ..SimulationParameters::default()
    };
    let mut plan = SweepPlan::new(base, SweepGrid::p_ready_only(vec![1.0], 0.0, 0.0), vec![0, 1]);
    plan.max_scan_depth = 3;
    plan.reference_scan_depth = 0;
    plan.snapshot_depths = vec![0, 3];

    let outcome = SweepRunner::new(plan).unwrap().run(&mut Silent).unwrap();
    let row = &outcome.rows[0];
    assert_eq!(row.best_scan_depth, 0);
    assert_eq!(row.regret, 0.0);
    assert_eq!(row.reference_best_hits, 2);
    assert_eq!(row.reference_top_k_hits, 2);
    assert_eq!(row.most_common_best(3), vec![(0, 2)]);
    assert_eq!(row.depth(3).unwrap().perf_per_watt.stdev, 0.0);
}

#[test]
fn summary_of_missing_depth_fails() {
    let plan = small_plan();
    let point = WorkloadPoint::new(0.2, 0.85, 0.05);
    let runner = SweepRunner::new(plan.clone()).unwrap();
    let samples: Vec<SweepSample> = runner
        .run_point(&point, &mut Silent)
        .unwrap()
        .into_iter()
        .filter(|s| s.scan_depth != 3)
        .collect();

    let err = SummaryRow::from_samples(point, &samples, &plan).unwrap_err();
    assert_eq!(
        format!("{err}"),
        "Error: empty sample set: no samples for N=3 at p_ready=0.2 stickiness=0.85 p_miss=0.05"
    );
}

#[test]
fn repeated_seeds_are_rejected_before_running() {
    let mut plan = small_plan();
    plan.seeds = vec![3, 3, 3];
    let err = SweepRunner::new(plan).err().unwrap();
    assert_eq!(
        format!("{err}"),
        "Error: invalid configuration: seed 3 given more than once"
    );
}

#[test]
#[should_panic(expected = "no seeds given")]
fn invalid_plan_is_rejected() {
    let mut plan = small_plan();
    plan.seeds.clear();
    let _ = SweepRunner::new(plan).unwrap();
}
