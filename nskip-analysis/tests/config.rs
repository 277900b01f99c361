// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::env;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use nskip_analysis::config::{AnalysisConfig, Study};
use nskip_model::params::SimulationParameters;
use serial_test::serial;
use tempfile::NamedTempFile;

fn cli(args: &[&str]) -> AnalysisConfig {
    let mut full = vec!["nskip-analysis"];
    full.extend_from_slice(args);
    AnalysisConfig::try_parse_from(full).unwrap()
}

fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    for (key, value) in vars {
        // SAFETY: tests touching the environment are serialised
        unsafe { env::set_var(key, value) };
    }
    let result = f();
    for (key, _) in vars {
        // SAFETY: as above
        unsafe { env::remove_var(key) };
    }
    result
}

fn conf_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial(env)]
fn defaults() {
    let config = AnalysisConfig::resolve(cli(&[])).unwrap();
    assert_eq!(config, AnalysisConfig::default());
    assert_eq!(config.study().unwrap(), Study::Both);
    assert_eq!(config.seeds, Some((0..10).collect()));
    assert_eq!(config.p_ready.as_ref().map(Vec::len), Some(8));
    assert_eq!(config.log_level().unwrap(), "info");
    assert!(!config.show_progress().unwrap());
}

#[test]
#[serial(env)]
fn default_base_matches_model_defaults() {
    let config = AnalysisConfig::resolve(cli(&[])).unwrap();
    assert_eq!(config.base_parameters().unwrap(), SimulationParameters::default());
}

#[test]
#[serial(env)]
fn command_line_overrides_defaults() {
    let config = AnalysisConfig::resolve(cli(&[
        "--study",
        "grid",
        "--p-ready",
        "0.25,0.75",
        "--seeds",
        "3,4",
        "--cycles",
        "1000",
        "--progress",
        "true",
    ]))
    .unwrap();

    assert_eq!(config.study().unwrap(), Study::Grid);
    assert_eq!(config.p_ready, Some(vec![0.25, 0.75]));
    assert_eq!(config.seeds, Some(vec![3, 4]));
    assert_eq!(config.cycles, Some(1000));
    assert!(config.show_progress().unwrap());
    assert_eq!(config.warmup, AnalysisConfig::default().warmup);
}

#[test]
#[serial(env)]
fn environment_overrides_defaults() {
    let config = with_env(&[("NSKIP_CYCLES", "3000"), ("NSKIP_STUDY", "seed")], || {
        AnalysisConfig::resolve(cli(&[])).unwrap()
    });
    assert_eq!(config.cycles, Some(3000));
    assert_eq!(config.study().unwrap(), Study::Seed);
}

#[test]
#[serial(env)]
fn command_line_overrides_environment() {
    let config = with_env(&[("NSKIP_CYCLES", "3000")], || {
        AnalysisConfig::resolve(cli(&["--cycles", "4000"])).unwrap()
    });
    assert_eq!(config.cycles, Some(4000));
}

#[test]
#[serial(env)]
fn conf_file_layer() {
    let file = conf_file(
        "study = \"seed\"\n\
         p_ready = [0.3]\n\
         cycles = 6000\n\
         warmup = 600\n\
         leakage_power = 2.5\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    let config = with_env(&[("NSKIP_WARMUP", "700")], || {
        AnalysisConfig::resolve(cli(&["--conf-file", &path, "--cycles", "8000"])).unwrap()
    });

    assert_eq!(config.study().unwrap(), Study::Seed);
    assert_eq!(config.p_ready, Some(vec![0.3]));
    assert_eq!(config.cycles, Some(8000));
    assert_eq!(config.warmup, Some(700));
    assert_eq!(config.leakage_power, Some(2.5));
    assert_eq!(config.conf_file, Some(PathBuf::from(&path)));
}

#[test]
#[serial(env)]
fn missing_conf_file() {
    let err = AnalysisConfig::resolve(cli(&["--conf-file", "/no/such/nskip.toml"])).unwrap_err();
    assert_eq!(format!("{err}"), "/no/such/nskip.toml not found");
}

#[test]
#[serial(env)]
fn conf_file_is_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_str().unwrap().to_string();
    let err = AnalysisConfig::resolve(cli(&["--conf-file", &path])).unwrap_err();
    assert_eq!(format!("{err}"), format!("{path} is not a file path"));
}

#[test]
#[serial(env)]
fn seed_plan_holds_base_workload() {
    let config = AnalysisConfig::resolve(cli(&[
        "--p-ready",
        "0.2,0.4",
        "--base-stickiness",
        "0.7",
        "--base-p-miss",
        "0.15",
    ]))
    .unwrap();
    let plan = config.seed_plan().unwrap();

    assert_eq!(plan.grid.p_ready, vec![0.2, 0.4]);
    assert_eq!(plan.grid.stickiness, vec![0.7]);
    assert_eq!(plan.grid.p_miss, vec![0.15]);
    assert_eq!(plan.num_runs(), 2 * 10 * 9);
    assert_eq!(plan.reference_scan_depth, 4);
    assert_eq!(plan.top_k, 2);
}

#[test]
#[serial(env)]
fn grid_plan_covers_all_dimensions() {
    let config = AnalysisConfig::resolve(cli(&[])).unwrap();
    let plan = config.grid_plan().unwrap();
    assert_eq!(plan.grid.num_points(), 8 * 6 * 4);
    assert_eq!(plan.snapshot_depths, vec![0, 2, 4, 6, 8]);
}

#[test]
#[serial(env)]
#[should_panic(expected = "reference scan depth 6 exceeds maximum scan depth 5")]
fn invalid_plan() {
    let config = AnalysisConfig::resolve(cli(&[
        "--max-scan-depth",
        "5",
        "--reference-scan-depth",
        "6",
    ]))
    .unwrap();
    config.grid_plan().unwrap();
}

#[test]
#[serial(env)]
#[should_panic(expected = "cycles (100) must exceed warmup (2000)")]
fn invalid_base_parameters() {
    let config = AnalysisConfig::resolve(cli(&["--cycles", "100"])).unwrap();
    config.seed_plan().unwrap();
}

#[test]
fn bad_study_name_is_rejected() {
    assert!(AnalysisConfig::try_parse_from(["nskip-analysis", "--study", "every"]).is_err());
}

#[test]
fn progress_is_a_plain_flag() {
    assert_eq!(cli(&["--progress"]).progress, Some(true));
    assert_eq!(cli(&["--progress", "false"]).progress, Some(false));
    assert_eq!(cli(&[]).progress, None);
}

#[test]
#[serial(env)]
fn bare_progress_flag_overrides_default() {
    let config = AnalysisConfig::resolve(cli(&["--progress", "--study", "seed"])).unwrap();
    assert!(config.show_progress().unwrap());
    assert_eq!(config.study().unwrap(), Study::Seed);
}

#[test]
#[serial(env)]
fn baseline_study_selection() {
    let config = AnalysisConfig::resolve(cli(&["--study", "baseline"])).unwrap();
    let study = config.study().unwrap();
    assert_eq!(study, Study::Baseline);
    assert!(study.includes_baseline());
    assert!(!study.includes_seed());
    assert!(!study.includes_grid());

    let all = Study::All;
    assert!(all.includes_seed() && all.includes_grid() && all.includes_baseline());
    assert!(!Study::Both.includes_baseline());
}

#[test]
#[serial(env)]
fn baseline_plan_uses_shared_settings() {
    let config = AnalysisConfig::resolve(cli(&[
        "--p-ready",
        "0.2,0.4",
        "--baseline-trials",
        "300",
        "--queue-len",
        "12",
        "--max-scan-depth",
        "6",
    ]))
    .unwrap();
    let plan = config.baseline_plan().unwrap();

    assert_eq!(plan.p_ready, vec![0.2, 0.4]);
    assert_eq!(plan.base.trials, 300);
    assert_eq!(plan.base.queue_len, 12);
    assert_eq!(plan.max_scan_depth, 6);
    assert_eq!(plan.num_runs(), 2 * 10 * 7);
    assert_eq!(
        config.baseline_summary_file().unwrap(),
        PathBuf::from("baseline_summary.csv")
    );
}

#[test]
#[serial(env)]
#[should_panic(expected = "trials must be > 0")]
fn baseline_plan_without_trials() {
    let config = AnalysisConfig::resolve(cli(&["--baseline-trials", "0"])).unwrap();
    config.baseline_plan().unwrap();
}
