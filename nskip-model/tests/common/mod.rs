// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use nskip_model::latency::LatencyRange;
use nskip_model::params::SimulationParameters;

/// Every entry is created ready, so every cycle issues from the head.
pub fn all_ready_params() -> SimulationParameters {
    SimulationParameters {
        scan_depth: 0,
        cycles: 1_000,
        warmup: 0,
        queue_len: 16,
        p_ready: 1.0,
        stickiness: 0.0,
        p_miss: 0.0,
        ..SimulationParameters::default()
    }
}

/// Every entry is a long-latency miss.
pub fn all_miss_params(scan_depth: usize, cycles: u64) -> SimulationParameters {
    SimulationParameters {
        scan_depth,
        cycles,
        warmup: 0,
        queue_len: 16,
        p_ready: 0.0,
        stickiness: 0.0,
        p_miss: 1.0,
        long_latency: LatencyRange::new(12, 40),
        ..SimulationParameters::default()
    }
}

/// A shortened version of the reference workload.
pub fn short_run_params(scan_depth: usize) -> SimulationParameters {
    SimulationParameters {
        scan_depth,
        cycles: 5_000,
        warmup: 500,
        ..SimulationParameters::default()
    }
}
