use crate::cli::ValidateArgs;
use crate::exit_codes;
use crate::output;
use crate::settings;
use serde::Serialize;
use std::path::{Path, PathBuf};
use xtest_rs::discovery::discover_channel_builds;
use xtest_rs::frontend::APP;

#[derive(Serialize)]
struct FileCheck {
    path: String,
    exists: bool,
    readable: bool,
    size_bytes: Option<u64>,
}

#[derive(Serialize)]
struct CaseCheck {
    test: String,
    channel_count: u32,
    binary: FileCheck,
    expect: FileCheck,
    ok: bool,
}

#[derive(Serialize)]
struct ValidateOutput {
    suite: &'static str,
    base_dir: String,
    cases: Vec<CaseCheck>,
    channel_builds_found: Vec<u32>,
    valid: bool,
}

fn check_file(path: &Path) -> FileCheck {
    let exists = path.exists();
    let readable = path.is_file() && std::fs::File::open(path).is_ok();
    FileCheck {
        path: path.display().to_string(),
        exists,
        readable,
        size_bytes: if readable {
            std::fs::metadata(path).ok().map(|m| m.len())
        } else {
            None
        },
    }
}

pub fn execute(args: ValidateArgs) -> i32 {
    let suite = match settings::resolve_suite(&args.suite) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let base_dir = PathBuf::from(&args.base_dir);
    if !base_dir.is_dir() {
        eprintln!("Error: Base directory not found: {}", args.base_dir);
        return exit_codes::INPUT_ERROR;
    }

    let cases: Vec<CaseCheck> = suite
        .invocations()
        .into_iter()
        .map(|inv| {
            let expect = args
                .expect
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or(inv.expect_path);
            let binary = check_file(&base_dir.join(&inv.binary_path));
            let expect = check_file(&base_dir.join(expect));
            CaseCheck {
                ok: binary.readable && expect.readable,
                test: inv.identity.test,
                channel_count: inv.channel_count,
                binary,
                expect,
            }
        })
        .collect();

    let channel_builds_found = discover_channel_builds(&base_dir, APP).unwrap_or_else(|e| {
        log::warn!("Could not scan for channel builds: {}", e);
        Vec::new()
    });

    let result = ValidateOutput {
        suite: suite.name(),
        base_dir: args.base_dir.clone(),
        valid: cases.iter().all(|c| c.ok),
        cases,
        channel_builds_found,
    };

    if args.json {
        match output::to_json(&result, false) {
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
        for case in &result.cases {
            let status = if case.ok { "OK" } else { "MISSING" };
            println!("{:<8}{} CH{}", status, case.test, case.channel_count);
            if !case.binary.readable {
                eprintln!("  binary not found: {}", case.binary.path);
            }
            if !case.expect.readable {
                eprintln!("  expect file not found: {}", case.expect.path);
            }
        }
        let builds: Vec<String> = result
            .channel_builds_found
            .iter()
            .map(|n| n.to_string())
            .collect();
        println!("Channel builds on disk: [{}]", builds.join(", "));
    }

    if result.valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::INPUT_ERROR
    }
}
