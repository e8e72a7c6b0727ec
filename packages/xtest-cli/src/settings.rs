use crate::cli::{parse_resources, RunArgs};
use crate::exit_codes;
use std::path::{Path, PathBuf};
use xtest_rs::suite::{find_suite, suite_names};
use xtest_rs::{Harness, HarnessConfig, TestSuite, XTestError};

/// Look up a suite by name.
pub fn resolve_suite(name: &str) -> Result<Box<dyn TestSuite>, String> {
    find_suite(name).ok_or_else(|| {
        format!(
            "Unknown suite '{}'. Available: {}",
            name,
            suite_names().join(", ")
        )
    })
}

/// Merge the config file (if any) with command-line overrides.
pub fn build_config(args: &RunArgs) -> Result<HarnessConfig, String> {
    let base_dir = PathBuf::from(args.base_dir.as_deref().unwrap_or("."));
    let mut config = HarnessConfig::load(args.config.as_deref().map(Path::new), &base_dir)
        .map_err(|e| e.to_string())?;

    if args.base_dir.is_some() {
        config.base_dir = base_dir;
    }
    if let Some(level) = args.level {
        config.level = level;
    }
    if let Some(ref expect) = args.expect {
        config.expect_file = Some(PathBuf::from(expect));
    }
    if let Some(ref simulator) = args.simulator {
        config.simulator = Some(simulator.clone());
    }
    if !args.sim_args.is_empty() {
        config.simulator_args = args.sim_args.clone();
    }
    for (kind, slots) in parse_resources(&args.resources)? {
        config.resources.insert(kind, slots);
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = Some(timeout);
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Build the harness, returning the exit code to use on failure.
pub fn resolve_harness(config: &HarnessConfig) -> Result<Harness, (i32, String)> {
    Harness::from_config(config).map_err(|e| match e {
        XTestError::SimulatorNotFound(_) => (exit_codes::SIMULATOR_NOT_FOUND, e.to_string()),
        _ => (exit_codes::INPUT_ERROR, e.to_string()),
    })
}
