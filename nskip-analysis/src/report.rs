// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! CSV reports and console summaries of completed studies.
//!
//! Floating point values are written with their shortest exact
//! representation. Every row repeats the run constants so that files from
//! different configurations can be concatenated.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use nskip_model::params::SimulationParameters;
use nskip_sweep::baseline::{BaselinePlan, BaselineRow};
use nskip_sweep::plan::SweepPlan;
use nskip_sweep::stats::most_common;
use nskip_sweep::summary::SummaryRow;

/// Create `path` and hand a buffered writer for it to `write`.
pub fn write_report_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write {}", path.display()))
}

fn run_constants_header(writer: &mut impl Write) -> io::Result<()> {
    write!(
        writer,
        "cycles,warmup,queue_len,power_scan_unit,power_issue_op,power_leakage"
    )
}

fn run_constants(writer: &mut impl Write, base: &SimulationParameters) -> io::Result<()> {
    write!(
        writer,
        "{},{},{},{},{},{}",
        base.cycles,
        base.warmup,
        base.queue_len,
        base.power.scan_unit,
        base.power.issue_op,
        base.power.leakage
    )
}

/// One line per workload point and scan depth.
pub fn write_seed_summary(
    writer: &mut impl Write,
    rows: &[SummaryRow],
    plan: &SweepPlan,
) -> io::Result<()> {
    write!(
        writer,
        "p_ready,stickiness,p_miss,n,ppw_mean,ppw_stdev,issue_mean,issue_stdev,\
         power_mean,power_stdev,best_n_count,reference_n,reference_top1_hits,\
         reference_top_k_hits,top_k,num_seeds,"
    )?;
    run_constants_header(writer)?;
    writeln!(writer)?;

    for row in rows {
        for depth in &row.depths {
            write!(
                writer,
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},",
                row.point.p_ready,
                row.point.stickiness,
                row.point.p_miss,
                depth.scan_depth,
                depth.perf_per_watt.mean,
                depth.perf_per_watt.stdev,
                depth.issue_rate.mean,
                depth.issue_rate.stdev,
                depth.avg_power.mean,
                depth.avg_power.stdev,
                depth.best_count,
                row.reference_scan_depth,
                row.reference_best_hits,
                row.reference_top_k_hits,
                row.top_k,
                row.num_seeds
            )?;
            run_constants(writer, &plan.base)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// One line per workload point.
pub fn write_sweep_summary(
    writer: &mut impl Write,
    rows: &[SummaryRow],
    plan: &SweepPlan,
) -> io::Result<()> {
    write!(
        writer,
        "p_ready,stickiness,p_miss,best_n,best_ppw_mean,reference_n,reference_ppw_mean,regret,"
    )?;
    for depth in &plan.snapshot_depths {
        write!(writer, "ppw_mean_n{depth},")?;
    }
    write!(
        writer,
        "num_seeds,short_lat_min,short_lat_max,long_lat_min,long_lat_max,"
    )?;
    run_constants_header(writer)?;
    writeln!(writer)?;

    let base = &plan.base;
    for row in rows {
        write!(
            writer,
            "{},{},{},{},{},{},{},{},",
            row.point.p_ready,
            row.point.stickiness,
            row.point.p_miss,
            row.best_scan_depth,
            row.best_perf_per_watt,
            row.reference_scan_depth,
            row.reference_perf_per_watt,
            row.regret
        )?;
        for depth in &plan.snapshot_depths {
            match row.snapshot(*depth) {
                Some(mean) => write!(writer, "{mean},")?,
                None => write!(writer, ",")?,
            }
        }
        write!(
            writer,
            "{},{},{},{},{},",
            row.num_seeds,
            base.short_latency.min,
            base.short_latency.max,
            base.long_latency.min,
            base.long_latency.max
        )?;
        run_constants(writer, base)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// One line per `p_ready` and scan depth of the Bernoulli baseline.
pub fn write_baseline_summary(
    writer: &mut impl Write,
    rows: &[BaselineRow],
    plan: &BaselinePlan,
) -> io::Result<()> {
    writeln!(
        writer,
        "p_ready,n,issue_mean,issue_stdev,power_mean,power_stdev,ppw_mean,ppw_stdev,\
         best_n,num_seeds,trials,queue_len,power_scan_unit,power_issue_op,power_leakage"
    )?;

    let base = &plan.base;
    for row in rows {
        for depth in &row.depths {
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                row.p_ready,
                depth.scan_depth,
                depth.issue_rate.mean,
                depth.issue_rate.stdev,
                depth.avg_power.mean,
                depth.avg_power.stdev,
                depth.perf_per_watt.mean,
                depth.perf_per_watt.stdev,
                row.best_scan_depth,
                row.num_seeds,
                base.trials,
                base.queue_len,
                base.power.scan_unit,
                base.power.issue_op,
                base.power.leakage
            )?;
        }
    }
    Ok(())
}

/// Mean rates of one scan depth, as shown in the per-N table.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DepthLine {
    pub scan_depth: usize,
    pub issue_rate: f64,
    pub avg_power: f64,
    pub perf_per_watt: f64,
}

impl fmt::Display for DepthLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "N = {:<4} | {:<10.3} | {:<12.2} | {:<12.5}",
            self.scan_depth, self.issue_rate, self.avg_power, self.perf_per_watt
        )
    }
}

impl DepthLine {
    pub fn from_seed_row(row: &SummaryRow) -> Vec<Self> {
        row.depths
            .iter()
            .map(|d| Self {
                scan_depth: d.scan_depth,
                issue_rate: d.issue_rate.mean,
                avg_power: d.avg_power.mean,
                perf_per_watt: d.perf_per_watt.mean,
            })
            .collect()
    }

    pub fn from_baseline_row(row: &BaselineRow) -> Vec<Self> {
        row.depths
            .iter()
            .map(|d| Self {
                scan_depth: d.scan_depth,
                issue_rate: d.issue_rate.mean,
                avg_power: d.avg_power.mean,
                perf_per_watt: d.perf_per_watt.mean,
            })
            .collect()
    }
}

/// Header, one line per depth and the best depth of a single `p_ready`.
pub fn depth_table(p_ready: f64, lines: &[DepthLine], best_scan_depth: usize) -> Vec<String> {
    let mut table = Vec::with_capacity(lines.len() + 2);
    table.push("N-Skip   | IssueRate  | Avg Power    | Perf/Watt".to_string());
    table.extend(lines.iter().map(ToString::to_string));
    if let Some(best) = lines.iter().find(|l| l.scan_depth == best_scan_depth) {
        table.push(format!(
            "Best N at p_ready={p_ready}: N={} (issue rate {:.3}, avg power {:.2}, perf/watt {:.5})",
            best.scan_depth, best.issue_rate, best.avg_power, best.perf_per_watt
        ));
    }
    table
}

/// Per-seed best depths of all rows sharing a `p_ready`.
#[derive(Clone, Debug, PartialEq)]
pub struct PReadySummary {
    pub p_ready: f64,

    /// Most frequent per-seed best depths with their counts.
    pub most_common_best: Vec<(usize, usize)>,
    pub reference_scan_depth: usize,
    pub reference_best_hits: usize,
    pub reference_top_k_hits: usize,
    pub top_k: usize,

    /// Seed runs across all the rows.
    pub num_seeds: usize,
}

impl fmt::Display for PReadySummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "p_ready={}: best N top{} = {:?}, N={} top1 {}/{}, top{} {}/{}",
            self.p_ready,
            self.most_common_best.len(),
            self.most_common_best,
            self.reference_scan_depth,
            self.reference_best_hits,
            self.num_seeds,
            self.top_k,
            self.reference_top_k_hits,
            self.num_seeds
        )
    }
}

/// Group rows by `p_ready`, in order of first appearance, keeping the `n`
/// most common best depths of each group.
pub fn summarise_by_p_ready(rows: &[SummaryRow], n: usize) -> Vec<PReadySummary> {
    let mut groups: Vec<(f64, Vec<&SummaryRow>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(p, _)| *p == row.point.p_ready) {
            Some((_, group)) => group.push(row),
            None => groups.push((row.point.p_ready, vec![row])),
        }
    }

    groups
        .into_iter()
        .filter_map(|(p_ready, group)| {
            let first = group.first()?;
            let mut best_counts: BTreeMap<usize, usize> = BTreeMap::new();
            for depth in group.iter().flat_map(|row| &row.depths) {
                *best_counts.entry(depth.scan_depth).or_default() += depth.best_count;
            }
            Some(PReadySummary {
                p_ready,
                most_common_best: most_common(&best_counts, n),
                reference_scan_depth: first.reference_scan_depth,
                reference_best_hits: group.iter().map(|row| row.reference_best_hits).sum(),
                reference_top_k_hits: group.iter().map(|row| row.reference_top_k_hits).sum(),
                top_k: first.top_k,
                num_seeds: group.iter().map(|row| row.num_seeds).sum(),
            })
        })
        .collect()
}
