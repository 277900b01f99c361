// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Console logging of the analysis.

use std::str::FromStr;

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ConfigBuilder, SimpleLogger};

/// Convert a level name such as `info` or `DEBUG` to a filter.
pub fn choose_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level).with_context(|| format!("unable to parse log level '{level}'"))
}

/// Install the global logger. May only be called once per process.
pub fn setup_logging(level: LevelFilter) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    SimpleLogger::init(level, config).context("failed to install logger")
}
