// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! `nskip-sweep` - Monte Carlo sweeps of the N-skip issue queue model.
//!
//! A [SweepPlan](plan::SweepPlan) names a grid of workload points, a set of
//! seeds and the range of scan depths. The [SweepRunner](runner::SweepRunner)
//! simulates every combination and reduces each workload point to a
//! [SummaryRow](summary::SummaryRow): per-depth means and standard
//! deviations, the best depth and the regret of a fixed reference depth.
//!
//! The [baseline] module runs the memoryless Bernoulli model over the same
//! depths for comparison.
//!
//! ```rust
//! use nskip_model::params::SimulationParameters;
//! use nskip_sweep::plan::{SweepGrid, SweepPlan};
//! use nskip_sweep::runner::{Silent, SweepRunner};
//!
//! let base = SimulationParameters {
//!     cycles: 500,
//!     warmup: 50,
//!     ..SimulationParameters::default()
//! };
//! let grid = SweepGrid::p_ready_only(vec![0.3, 0.7], 0.85, 0.1);
//! let runner = SweepRunner::new(SweepPlan::new(base, grid, vec![0, 1])).unwrap();
//! let outcome = runner.run(&mut Silent).unwrap();
//! assert_eq!(outcome.rows.len(), 2);
//! assert!(outcome.rows.iter().all(|row| row.regret >= 0.0));
//! ```

pub mod baseline;
pub mod plan;
pub mod runner;
pub mod stats;
pub mod summary;
