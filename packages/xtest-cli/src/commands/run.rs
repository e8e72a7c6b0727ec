use crate::cli::RunArgs;
use crate::exit_codes;
use crate::output::{self, RunReport};
use crate::settings;
use std::sync::Arc;
use std::time::Instant;

pub async fn execute(args: RunArgs) -> i32 {
    let suite = match settings::resolve_suite(&args.suite) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let config = match settings::build_config(&args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let harness = match settings::resolve_harness(&config) {
        Ok(h) => Arc::new(h),
        Err((code, msg)) => {
            eprintln!("Error: {}", msg);
            return code;
        }
    };

    if !args.quiet {
        eprintln!(
            "Running suite '{}' at level {} in {}...",
            suite.name(),
            config.level,
            config.base_dir.display()
        );
        eprintln!("  Simulator: {}", harness.simulator().program().display());
    }

    let start_time = Instant::now();
    if args.parallel {
        harness.run_suite_concurrent(suite.as_ref()).await;
    } else {
        harness.run_suite(suite.as_ref()).await;
    }

    let results = harness.registry().results();
    let summary = harness.registry().summary();

    if !args.quiet {
        for result in &results {
            eprintln!("  {}", output::result_line(result));
        }
        eprintln!(
            "Suite complete: {}/{} passed, {} failed, {} errored, {} skipped, {:.1}s",
            summary.passed,
            summary.total,
            summary.failed,
            summary.errored,
            summary.skipped,
            start_time.elapsed().as_secs_f64()
        );
    }

    let report = RunReport {
        suite: suite.name(),
        level: config.level,
        simulator: harness.simulator().program().display().to_string(),
        summary,
        results,
    };

    match output::to_json(&report, args.compact) {
        Ok(json) => {
            if let Err(e) = output::write_output(&json, args.output.as_deref()) {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
            if !args.quiet {
                if let Some(ref path) = args.output {
                    eprintln!("Report written to {}", path);
                }
            }
        }
        Err(e) => {
            eprintln!("Error serializing report: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    }

    if summary.is_success() {
        exit_codes::SUCCESS
    } else {
        exit_codes::TEST_FAILURE
    }
}
