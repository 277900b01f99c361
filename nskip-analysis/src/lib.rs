// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! `nskip-analysis` - the command-line front end of the N-skip evaluation.
//!
//! Three studies can be run:
//!  - the *seed study* repeats every `p_ready` over all seeds at a single
//!    stickiness and miss probability and reports how often each scan depth
//!    wins,
//!  - the *grid sweep* covers `p_ready` x `stickiness` x `p_miss` and reports
//!    the best depth and the regret of the reference depth at every point,
//!  - the *baseline* scores every depth on queues whose entries are ready
//!    independently with probability `p_ready`.
//!
//! Results are written as CSV, see [report].

use anyhow::Result;
use log::info;
use nskip_sweep::baseline::run_baseline;
use nskip_sweep::plan::SweepPlan;
use nskip_sweep::runner::{SweepOutcome, SweepRunner};

use crate::config::AnalysisConfig;
use crate::progress::ProgressObserver;
use crate::report::{
    DepthLine, depth_table, summarise_by_p_ready, write_baseline_summary, write_report_file,
    write_seed_summary, write_sweep_summary,
};

pub mod config;
pub mod logging;
pub mod progress;
pub mod report;

/// Number of most common best depths logged per `p_ready`.
const NUM_COMMON_BEST: usize = 3;

/// Simulate every run of `plan`.
pub fn run_study(name: &str, plan: &SweepPlan, show_progress: bool) -> Result<SweepOutcome> {
    info!(
        "Running {name}: {} workload points, {} seeds, N=0..={}, {} runs",
        plan.grid.num_points(),
        plan.seeds.len(),
        plan.max_scan_depth,
        plan.num_runs()
    );

    let runner = SweepRunner::new(plan.clone())?;
    let mut progress = ProgressObserver::new(show_progress, plan.num_runs());
    let outcome = runner.run(&mut progress)?;
    progress.finish();

    info!("Completed {name}: {} workload points", progress.points_done());
    Ok(outcome)
}

fn log_depth_table(p_ready: f64, lines: &[DepthLine], best_scan_depth: usize) {
    for line in depth_table(p_ready, lines, best_scan_depth) {
        info!("  {line}");
    }
}

/// Run the configured studies and write their reports.
pub fn run(config: &AnalysisConfig) -> Result<()> {
    let study = config.study()?;
    let show_progress = config.show_progress()?;

    // Build every plan first so a bad configuration fails before any run
    let seed_plan = if study.includes_seed() {
        Some(config.seed_plan()?)
    } else {
        None
    };
    let grid_plan = if study.includes_grid() {
        Some(config.grid_plan()?)
    } else {
        None
    };
    let baseline_plan = if study.includes_baseline() {
        Some(config.baseline_plan()?)
    } else {
        None
    };

    if let Some(plan) = seed_plan {
        let outcome = run_study("seed study", &plan, show_progress)?;
        for row in &outcome.rows {
            log_depth_table(
                row.point.p_ready,
                &DepthLine::from_seed_row(row),
                row.best_scan_depth,
            );
        }
        for summary in summarise_by_p_ready(&outcome.rows, NUM_COMMON_BEST) {
            info!("  {summary}");
        }
        let path = config.seed_summary_file()?;
        write_report_file(&path, |w| write_seed_summary(w, &outcome.rows, &plan))?;
        info!("Wrote {}", path.display());
    }

    if let Some(plan) = grid_plan {
        let outcome = run_study("grid sweep", &plan, show_progress)?;
        for p_ready in &plan.grid.p_ready {
            let rows: Vec<_> = outcome.rows_for_p_ready(*p_ready).collect();
            let worst = rows.iter().map(|row| row.regret).fold(0.0, f64::max);
            info!(
                "  p_ready={p_ready}: worst N={} regret {worst:.5} over {} points",
                plan.reference_scan_depth,
                rows.len()
            );
        }
        let path = config.sweep_summary_file()?;
        write_report_file(&path, |w| write_sweep_summary(w, &outcome.rows, &plan))?;
        info!("Wrote {}", path.display());
    }

    if let Some(plan) = baseline_plan {
        info!(
            "Running baseline: {} p_ready values, {} seeds, N=0..={}, {} trials per run",
            plan.p_ready.len(),
            plan.seeds.len(),
            plan.max_scan_depth,
            plan.base.trials
        );
        let rows = run_baseline(&plan)?;
        for row in &rows {
            log_depth_table(
                row.p_ready,
                &DepthLine::from_baseline_row(row),
                row.best_scan_depth,
            );
        }
        let path = config.baseline_summary_file()?;
        write_report_file(&path, |w| write_baseline_summary(w, &rows, &plan))?;
        info!("Wrote {}", path.display());
    }

    Ok(())
}
