// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Layered configuration of the analysis front end.
//!
//! Each setting is resolved from, in increasing priority:
//!  - the built-in defaults,
//!  - an optional TOML file named with `--conf-file` (or `NSKIP_CONF_FILE`),
//!  - environment variables prefixed with `NSKIP_`,
//!  - the command line.
//!
//! Every field is an `Option` so that a source which does not mention a
//! setting leaves the value of the lower priority sources untouched.
//!
//! An example configuration file:
//! ```toml
//! study = "grid"
//! p_ready = [0.2, 0.5, 0.8]
//! stickiness = [0.7, 0.9]
//! seeds = [0, 1, 2, 3]
//! cycles = 10000
//! warmup = 1000
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use nskip_model::bernoulli::BernoulliParameters;
use nskip_model::latency::LatencyRange;
use nskip_model::params::{PowerWeights, SimulationParameters};
use nskip_sweep::baseline::BaselinePlan;
use nskip_sweep::plan::{SweepGrid, SweepPlan};
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables read as configuration.
pub const ENV_PREFIX: &str = "NSKIP_";

/// Which studies to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Study {
    /// Repeat seeds over `p_ready` at the base stickiness and miss rate.
    Seed,
    /// Sweep `p_ready` x `stickiness` x `p_miss`.
    Grid,
    /// The memoryless Bernoulli model over `p_ready`.
    Baseline,
    /// Seed study and grid sweep.
    Both,
    /// Every study, baseline included.
    All,
}

impl Study {
    pub fn includes_seed(&self) -> bool {
        matches!(self, Study::Seed | Study::Both | Study::All)
    }

    pub fn includes_grid(&self) -> bool {
        matches!(self, Study::Grid | Study::Both | Study::All)
    }

    pub fn includes_baseline(&self) -> bool {
        matches!(self, Study::Baseline | Study::All)
    }
}

#[derive(Clone, Debug, PartialEq, Parser, Serialize, Deserialize)]
#[command(
    name = "nskip-analysis",
    about = "Monte Carlo evaluation of N-skip issue queue scan depths"
)]
pub struct AnalysisConfig {
    /// Studies to run
    #[arg(long, value_enum)]
    pub study: Option<Study>,

    /// Ready probabilities to evaluate (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub p_ready: Option<Vec<f64>>,

    /// Stickiness values of the grid sweep (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub stickiness: Option<Vec<f64>>,

    /// Miss probabilities of the grid sweep (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub p_miss: Option<Vec<f64>>,

    /// Stickiness used by the seed study
    #[arg(long)]
    pub base_stickiness: Option<f64>,

    /// Miss probability used by the seed study
    #[arg(long)]
    pub base_p_miss: Option<f64>,

    /// Seeds to repeat every simulation with (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub seeds: Option<Vec<u64>>,

    /// Total simulated cycles per run
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Leading cycles excluded from the issue rate
    #[arg(long)]
    pub warmup: Option<u64>,

    /// Number of issue queue entries
    #[arg(long)]
    pub queue_len: Option<usize>,

    /// Shortest latency of a short-latency entry
    #[arg(long)]
    pub short_latency_min: Option<u64>,

    /// Longest latency of a short-latency entry
    #[arg(long)]
    pub short_latency_max: Option<u64>,

    /// Shortest latency of a long-latency (miss) entry
    #[arg(long)]
    pub long_latency_min: Option<u64>,

    /// Longest latency of a long-latency (miss) entry
    #[arg(long)]
    pub long_latency_max: Option<u64>,

    /// Power of examining one queue position
    #[arg(long)]
    pub scan_unit_power: Option<f64>,

    /// Power of issuing one operation
    #[arg(long)]
    pub issue_op_power: Option<f64>,

    /// Power consumed every cycle
    #[arg(long)]
    pub leakage_power: Option<f64>,

    /// Largest scan depth N evaluated; every N from 0 up to it is simulated
    #[arg(long)]
    pub max_scan_depth: Option<usize>,

    /// Static scan depth that the best depth is compared against
    #[arg(long)]
    pub reference_scan_depth: Option<usize>,

    /// Rank within which the reference depth counts as a hit
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Scan depths whose mean perf/watt is reported by the grid sweep
    #[arg(long, value_delimiter = ',')]
    pub snapshot_depths: Option<Vec<usize>>,

    /// Independent trials per run of the Bernoulli baseline
    #[arg(long)]
    pub baseline_trials: Option<u64>,

    /// File the baseline summary is written to
    #[arg(long)]
    pub baseline_summary_file: Option<PathBuf>,

    /// File the seed study summary is written to
    #[arg(long)]
    pub seed_summary_file: Option<PathBuf>,

    /// File the grid sweep summary is written to
    #[arg(long)]
    pub sweep_summary_file: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Show a progress bar of completed simulation runs
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub progress: Option<bool>,

    /// Path to additional configuration file
    ///
    /// This additional configuration file must contain TOML, and set values
    /// for fields of this struct.
    #[arg(long)]
    pub conf_file: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let params = SimulationParameters::default();
        Self {
            study: Some(Study::Both),
            p_ready: Some(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]),
            stickiness: Some(vec![0.60, 0.70, 0.80, 0.85, 0.90, 0.95]),
            p_miss: Some(vec![0.05, 0.10, 0.15, 0.20]),
            base_stickiness: Some(params.stickiness),
            base_p_miss: Some(params.p_miss),
            seeds: Some((0..10).collect()),
            cycles: Some(params.cycles),
            warmup: Some(params.warmup),
            queue_len: Some(params.queue_len),
            short_latency_min: Some(params.short_latency.min),
            short_latency_max: Some(params.short_latency.max),
            long_latency_min: Some(params.long_latency.min),
            long_latency_max: Some(params.long_latency.max),
            scan_unit_power: Some(params.power.scan_unit),
            issue_op_power: Some(params.power.issue_op),
            leakage_power: Some(params.power.leakage),
            max_scan_depth: Some(8),
            reference_scan_depth: Some(4),
            top_k: Some(2),
            snapshot_depths: Some(vec![0, 2, 4, 6, 8]),
            baseline_trials: Some(BernoulliParameters::default().trials),
            baseline_summary_file: Some(PathBuf::from("baseline_summary.csv")),
            seed_summary_file: Some(PathBuf::from("seed_summary.csv")),
            sweep_summary_file: Some(PathBuf::from("sweep_summary.csv")),
            log_level: Some("info".to_string()),
            progress: Some(false),
            conf_file: Some(Default::default()),
        }
    }
}

/// Overwrite each field of `config` that is set in `cli`.
macro_rules! merge_fields {
    ($config:ident, $cli:ident, $($field:ident),+ $(,)?) => {
        $(
            if $cli.$field.is_some() {
                $config.$field = $cli.$field;
            }
        )+
    };
}

impl AnalysisConfig {
    /// Resolve the configuration from every source, including the process
    /// command line.
    pub fn parse_all_sources() -> Result<Self> {
        Self::resolve(Self::parse())
    }

    /// Resolve the configuration with `cli` as the command-line layer.
    pub fn resolve(cli: Self) -> Result<Self> {
        let config = Self::figment_to_config(None)?.clap_merge(cli.clone());
        let conf_file = config.conf_file.clone().unwrap_or_default();
        if conf_file.as_os_str().is_empty() {
            return Ok(config);
        }

        check_conf_file(&conf_file)?;
        Ok(Self::figment_to_config(Some(&conf_file))?.clap_merge(cli))
    }

    /// Defaults, then the TOML file if any, then the environment.
    pub fn figment(conf_file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(conf_file) = conf_file {
            figment = figment.merge(Toml::file(conf_file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn figment_to_config(conf_file: Option<&Path>) -> Result<Self> {
        Self::figment(conf_file)
            .extract()
            .context("failed to read configuration")
    }

    #[must_use]
    pub fn clap_merge(mut self, cli: Self) -> Self {
        merge_fields!(
            self,
            cli,
            study,
            p_ready,
            stickiness,
            p_miss,
            base_stickiness,
            base_p_miss,
            seeds,
            cycles,
            warmup,
            queue_len,
            short_latency_min,
            short_latency_max,
            long_latency_min,
            long_latency_max,
            scan_unit_power,
            issue_op_power,
            leakage_power,
            max_scan_depth,
            reference_scan_depth,
            top_k,
            snapshot_depths,
            baseline_trials,
            baseline_summary_file,
            seed_summary_file,
            sweep_summary_file,
            log_level,
            progress,
            conf_file,
        );
        self
    }

    pub fn study(&self) -> Result<Study> {
        required(&self.study, "study")
    }

    pub fn log_level(&self) -> Result<String> {
        required(&self.log_level, "log_level")
    }

    pub fn show_progress(&self) -> Result<bool> {
        required(&self.progress, "progress")
    }

    pub fn seed_summary_file(&self) -> Result<PathBuf> {
        required(&self.seed_summary_file, "seed_summary_file")
    }

    pub fn sweep_summary_file(&self) -> Result<PathBuf> {
        required(&self.sweep_summary_file, "sweep_summary_file")
    }

    pub fn baseline_summary_file(&self) -> Result<PathBuf> {
        required(&self.baseline_summary_file, "baseline_summary_file")
    }

    /// The architectural constants shared by every run. The workload
    /// probabilities are those of the seed study.
    pub fn base_parameters(&self) -> Result<SimulationParameters> {
        Ok(SimulationParameters {
            scan_depth: required(&self.reference_scan_depth, "reference_scan_depth")?,
            cycles: required(&self.cycles, "cycles")?,
            warmup: required(&self.warmup, "warmup")?,
            queue_len: required(&self.queue_len, "queue_len")?,
            stickiness: required(&self.base_stickiness, "base_stickiness")?,
            p_miss: required(&self.base_p_miss, "base_p_miss")?,
            short_latency: LatencyRange::new(
                required(&self.short_latency_min, "short_latency_min")?,
                required(&self.short_latency_max, "short_latency_max")?,
            ),
            long_latency: LatencyRange::new(
                required(&self.long_latency_min, "long_latency_min")?,
                required(&self.long_latency_max, "long_latency_max")?,
            ),
            power: PowerWeights {
                scan_unit: required(&self.scan_unit_power, "scan_unit_power")?,
                issue_op: required(&self.issue_op_power, "issue_op_power")?,
                leakage: required(&self.leakage_power, "leakage_power")?,
            },
            ..SimulationParameters::default()
        })
    }

    /// Every `p_ready` at the base stickiness and miss probability.
    pub fn seed_plan(&self) -> Result<SweepPlan> {
        let grid = SweepGrid::p_ready_only(
            required(&self.p_ready, "p_ready")?,
            required(&self.base_stickiness, "base_stickiness")?,
            required(&self.base_p_miss, "base_p_miss")?,
        );
        self.plan(grid)
    }

    /// The full `p_ready` x `stickiness` x `p_miss` grid.
    pub fn grid_plan(&self) -> Result<SweepPlan> {
        let grid = SweepGrid::new(
            required(&self.p_ready, "p_ready")?,
            required(&self.stickiness, "stickiness")?,
            required(&self.p_miss, "p_miss")?,
        );
        self.plan(grid)
    }

    /// The Bernoulli baseline over every `p_ready`.
    pub fn baseline_plan(&self) -> Result<BaselinePlan> {
        let base = BernoulliParameters {
            scan_depth: required(&self.reference_scan_depth, "reference_scan_depth")?,
            trials: required(&self.baseline_trials, "baseline_trials")?,
            queue_len: required(&self.queue_len, "queue_len")?,
            power: PowerWeights {
                scan_unit: required(&self.scan_unit_power, "scan_unit_power")?,
                issue_op: required(&self.issue_op_power, "issue_op_power")?,
                leakage: required(&self.leakage_power, "leakage_power")?,
            },
            ..BernoulliParameters::default()
        };
        let mut plan = BaselinePlan::new(
            base,
            required(&self.p_ready, "p_ready")?,
            required(&self.seeds, "seeds")?,
        );
        plan.max_scan_depth = required(&self.max_scan_depth, "max_scan_depth")?;
        plan.validate()?;
        Ok(plan)
    }

    fn plan(&self, grid: SweepGrid) -> Result<SweepPlan> {
        let mut plan = SweepPlan::new(
            self.base_parameters()?,
            grid,
            required(&self.seeds, "seeds")?,
        );
        plan.max_scan_depth = required(&self.max_scan_depth, "max_scan_depth")?;
        plan.reference_scan_depth = required(&self.reference_scan_depth, "reference_scan_depth")?;
        plan.top_k = required(&self.top_k, "top_k")?;
        plan.snapshot_depths = required(&self.snapshot_depths, "snapshot_depths")?;
        plan.validate()?;
        Ok(plan)
    }
}

fn required<T: Clone>(value: &Option<T>, name: &str) -> Result<T> {
    value
        .clone()
        .ok_or_else(|| anyhow!("configuration option {name} has no value"))
}

fn check_conf_file(conf_file: &Path) -> Result<()> {
    if conf_file.is_dir() {
        bail!("{} is not a file path", conf_file.display());
    }
    if !conf_file.exists() {
        bail!("{} not found", conf_file.display());
    }
    Ok(())
}
