use clap::{Args, Parser, Subcommand};
use xtest_rs::TestLevel;

#[derive(Parser)]
#[command(
    name = "xtest",
    version,
    about = "Simulator-backed golden-output regression tests for lib_mic_array",
    long_about = "Run lib_mic_array test binaries under xsim and compare their output\n\
                  against golden expect files. Set $XSIM_PATH or use --simulator."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a test suite under the simulator
    Run(RunArgs),
    /// List the test cases a suite registers
    List(ListArgs),
    /// Show simulator resolution and platform information
    Info(InfoArgs),
    /// Check that binaries and golden files exist for a suite
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Suite to run
    #[arg(long, default_value = "frontend")]
    pub suite: String,

    /// Test level of this run (smoke, nightly, weekend)
    #[arg(long, env = "XTEST_LEVEL")]
    pub level: Option<TestLevel>,

    /// Directory holding the test binaries and expect files
    #[arg(long)]
    pub base_dir: Option<String>,

    /// Golden file to compare against instead of the suite's own
    #[arg(long)]
    pub expect: Option<String>,

    /// Path to the simulator executable
    #[arg(long, env = "XSIM_PATH")]
    pub simulator: Option<String>,

    /// Extra argument passed to the simulator before the binary (repeatable)
    #[arg(long = "sim-arg", allow_hyphen_values = true)]
    pub sim_args: Vec<String>,

    /// Resource pool size as "kind=slots" (e.g. "xsim=2")
    #[arg(long = "resource")]
    pub resources: Vec<String>,

    /// Launch all test cases at once, bounded by the resource pools
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Per-run simulator timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// JSON config file
    #[arg(long)]
    pub config: Option<String>,

    /// Report file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list this suite
    #[arg(long)]
    pub suite: Option<String>,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Path to the simulator executable
    #[arg(long, env = "XSIM_PATH")]
    pub simulator: Option<String>,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Suite to validate
    #[arg(long, default_value = "frontend")]
    pub suite: String,

    /// Directory holding the test binaries and expect files
    #[arg(long, default_value = ".")]
    pub base_dir: String,

    /// Golden file to check instead of the suite's own
    #[arg(long)]
    pub expect: Option<String>,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Parse a resource pool size "kind=slots" into (kind, slots).
pub fn parse_resource(s: &str) -> Result<(String, usize), String> {
    let (kind, slots) = s.split_once('=').ok_or_else(|| {
        format!("Invalid resource '{}': expected 'kind=slots', e.g. 'xsim=2'", s)
    })?;
    let kind = kind.trim();
    if kind.is_empty() {
        return Err(format!("Invalid resource '{}': empty kind", s));
    }
    let slots = slots
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid resource '{}': '{}' is not a valid count", s, slots))?;
    if slots == 0 {
        return Err(format!("Invalid resource '{}': need at least one slot", s));
    }
    Ok((kind.to_string(), slots))
}

/// Parse a list of resource strings.
pub fn parse_resources(resources: &[String]) -> Result<Vec<(String, usize)>, String> {
    resources.iter().map(|s| parse_resource(s)).collect()
}
