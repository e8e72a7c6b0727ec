use crate::cli::InfoArgs;
use crate::exit_codes;
use crate::output;
use serde::Serialize;
use xtest_rs::config::user_config_path;
use xtest_rs::discovery::{
    find_simulator, DEFAULT_SIMULATOR_PATHS, SIMULATOR_ENV_VAR, SIMULATOR_NAME, TOOLS_HOME_ENV_VAR,
};
use xtest_rs::suite::suite_names;

#[derive(Serialize)]
struct InfoOutput {
    cli_version: String,
    simulator_name: &'static str,
    simulator_path: Option<String>,
    simulator_found: bool,
    simulator_env_vars: [&'static str; 2],
    search_paths: Vec<&'static str>,
    user_config: Option<String>,
    suites: Vec<&'static str>,
    platform: String,
    arch: String,
}

pub fn execute(args: InfoArgs) -> i32 {
    let simulator_path = find_simulator(args.simulator.as_deref());

    let info = InfoOutput {
        cli_version: env!("CARGO_PKG_VERSION").to_string(),
        simulator_name: SIMULATOR_NAME,
        simulator_path: simulator_path.as_ref().map(|p| p.display().to_string()),
        simulator_found: simulator_path.is_some(),
        simulator_env_vars: [SIMULATOR_ENV_VAR, TOOLS_HOME_ENV_VAR],
        search_paths: DEFAULT_SIMULATOR_PATHS.to_vec(),
        user_config: user_config_path().map(|p| p.display().to_string()),
        suites: suite_names(),
        platform: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
    };

    if args.json {
        match output::to_json(&info, false) {
            Ok(json) => {
                if let Err(e) = output::write_output(&json, None) {
                    eprintln!("Error: {}", e);
                    return exit_codes::EXECUTION_ERROR;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
        }
    } else {
        println!("xtest CLI v{}", info.cli_version);
        println!("Platform: {} ({})", info.platform, info.arch);
        println!();
        match info.simulator_path {
            Some(ref path) => println!("Simulator: {}", path),
            None => println!("Simulator: not found"),
        }
        println!("  Set ${} or ${} to override", SIMULATOR_ENV_VAR, TOOLS_HOME_ENV_VAR);
        println!("  Search paths: {}", info.search_paths.join(", "));
        if let Some(ref cfg) = info.user_config {
            println!("User config: {}", cfg);
        }
        println!("Suites: {}", info.suites.join(", "));
    }

    exit_codes::SUCCESS
}
