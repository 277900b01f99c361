// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;

/// Absolute cycle number within a single simulation run.
pub type Cycle = u64;

// Simulation errors

#[macro_export]
/// Build an `Err(SimError::InvalidConfiguration)` from a format string
macro_rules! invalid_config {
    ($($arg:tt)+) => {
        Err($crate::types::SimError::InvalidConfiguration(format!($($arg)+)))
    };
}

#[macro_export]
/// Build an `Err(SimError::EmptySampleSet)` naming what was being reduced
macro_rules! empty_samples {
    ($($arg:tt)+) => {
        Err($crate::types::SimError::EmptySampleSet(format!($($arg)+)))
    };
}

/// The `SimError` is what should be returned in the case of an error
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// The parameters cannot describe a valid run. Raised before any
    /// simulation work is done.
    InvalidConfiguration(String),

    /// A statistic was requested over no samples at all.
    EmptySampleSet(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::InvalidConfiguration(msg) => {
                write!(f, "Error: invalid configuration: {msg}")
            }
            SimError::EmptySampleSet(msg) => {
                write!(f, "Error: empty sample set: {msg}")
            }
        }
    }
}

impl Error for SimError {}

/// The SimResult is the return type for most simulation functions
pub type SimResult<T = ()> = Result<T, SimError>;

/// Check that a probability is finite and within `[0, 1]`.
pub fn check_probability(name: &str, value: f64) -> SimResult {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return invalid_config!("{name} must be within [0, 1], got {value}");
    }
    Ok(())
}
