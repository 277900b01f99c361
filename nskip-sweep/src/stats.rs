// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Reduce Monte Carlo samples to summary statistics.
//!
//! Selection is always deterministic: when two keys have the same score the
//! smaller key ranks first.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use nskip_model::empty_samples;
use nskip_model::types::SimResult;
use serde::{Deserialize, Serialize};

/// Mean and sample standard deviation of a set of samples.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeanStdev {
    pub mean: f64,
    pub stdev: f64,
    pub count: usize,
}

pub fn mean(samples: &[f64]) -> SimResult<f64> {
    if samples.is_empty() {
        return empty_samples!("mean of no samples is undefined");
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Compute the mean and the (n - 1) standard deviation. The standard
/// deviation of fewer than two samples is 0.
pub fn reduce(samples: &[f64]) -> SimResult<MeanStdev> {
    let mean = mean(samples)?;
    let count = samples.len();
    let stdev = if count < 2 {
        0.0
    } else {
        let sum_sq: f64 = samples.iter().map(|x| (x - mean) * (x - mean)).sum();
        (sum_sq / (count - 1) as f64).sqrt()
    };
    Ok(MeanStdev { mean, stdev, count })
}

/// Higher score first, then smaller key.
fn rank_order<K: Ord>(a: (&K, &f64), b: (&K, &f64)) -> Ordering {
    b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0))
}

/// All keys ordered from best to worst score.
pub fn ranked<K: Ord + Copy>(scores_by_key: &BTreeMap<K, f64>) -> Vec<K> {
    let mut entries: Vec<(&K, &f64)> = scores_by_key.iter().collect();
    entries.sort_by(|a, b| rank_order(*a, *b));
    entries.into_iter().map(|(key, _)| *key).collect()
}

/// The key with the highest score.
pub fn best_choice<K: Ord + Copy>(scores_by_key: &BTreeMap<K, f64>) -> SimResult<K> {
    match scores_by_key.iter().min_by(|a, b| rank_order(*a, *b)) {
        Some((key, _)) => Ok(*key),
        None => empty_samples!("no scores to choose from"),
    }
}

/// Is `target` one of the `k` best keys?
pub fn rank_includes<K: Ord + Copy>(target: K, scores_by_key: &BTreeMap<K, f64>, k: usize) -> bool {
    ranked(scores_by_key).into_iter().take(k).any(|key| key == target)
}

/// The `n` most frequent keys with their counts, most frequent first and
/// smaller keys first on equal counts.
pub fn most_common<K: Ord + Copy>(counts: &BTreeMap<K, usize>, n: usize) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(key, count)| (*key, *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}
