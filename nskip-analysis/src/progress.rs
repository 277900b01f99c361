// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use indicatif::ProgressBar;
use nskip_sweep::runner::SweepObserver;
use nskip_sweep::summary::{SummaryRow, SweepSample};

/// Advances a progress bar once per completed simulation run.
pub struct ProgressObserver {
    bar: Option<ProgressBar>,
    points_done: usize,
}

impl ProgressObserver {
    /// With `enabled` false nothing is drawn.
    pub fn new(enabled: bool, total_runs: usize) -> Self {
        Self {
            bar: enabled.then(|| ProgressBar::new(total_runs as u64)),
            points_done: 0,
        }
    }

    pub fn points_done(&self) -> usize {
        self.points_done
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish();
        }
    }
}

impl SweepObserver for ProgressObserver {
    fn run_complete(&mut self, _sample: &SweepSample) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn point_complete(&mut self, _row: &SummaryRow) {
        self.points_done += 1;
    }
}
