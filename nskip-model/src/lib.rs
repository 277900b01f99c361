// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! `nskip-model` - a stochastic model of a single out-of-order issue queue
//! driven by a bounded-scan ("N-skip") issue policy.
//!
//! The model is a relative-trend estimator. It is not a timing-accurate
//! microarchitectural simulator: there is one issue slot per cycle, no real
//! dependency graph and power is a sum of dimensionless weights.
//!
//! The pieces, leaf first:
//!  - [state]: the readiness class of a new entry, with temporal correlation
//!    ("stickiness") to the previously created entry.
//!  - [latency]: the per-class delay distributions.
//!  - [issue_queue]: the queue itself and the early-out head scan.
//!  - [simulator]: one complete run (warmup plus measured cycles) reduced to
//!    issue rate, average power and perf/watt.
//!  - [bernoulli]: a memoryless baseline where every trial scans a freshly
//!    drawn queue of independently ready entries.
//!
//! # Simple Application
//!
//! ```rust
//! use nskip_model::params::SimulationParameters;
//! use nskip_model::simulator::run_seeded;
//!
//! let params = SimulationParameters {
//!     scan_depth: 0,
//!     cycles: 1_000,
//!     warmup: 0,
//!     p_ready: 1.0,
//!     p_miss: 0.0,
//!     stickiness: 0.0,
//!     ..SimulationParameters::default()
//! };
//! let result = run_seeded(&params, 0).unwrap();
//! assert_eq!(result.issue_rate, 1.0);
//! assert_eq!(result.avg_power, 14.0);
//! ```

pub mod bernoulli;
pub mod issue_queue;
pub mod latency;
pub mod params;
pub mod simulator;
pub mod state;
pub mod types;
