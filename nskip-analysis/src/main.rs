// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Run the N-skip seed study, grid sweep and Bernoulli baseline.
//!
//! For example, a quick grid sweep:
//!   cargo run --release --bin nskip-analysis -- --study grid --seeds 0,1,2
//! --cycles 5000 --warmup 500 --progress

use anyhow::Result;
use nskip_analysis::config::AnalysisConfig;
use nskip_analysis::logging::{choose_level, setup_logging};

fn main() -> Result<()> {
    let config = AnalysisConfig::parse_all_sources()?;
    setup_logging(choose_level(&config.log_level()?)?)?;
    nskip_analysis::run(&config)
}
