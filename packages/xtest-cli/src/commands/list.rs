use crate::cli::ListArgs;
use crate::exit_codes;
use crate::output;
use crate::settings;
use serde::Serialize;
use xtest_rs::suite::suites;
use xtest_rs::{TestInvocation, TestSuite};

#[derive(Serialize)]
struct SuiteListing {
    suite: &'static str,
    description: &'static str,
    tests: Vec<TestInvocation>,
}

pub fn execute(args: ListArgs) -> i32 {
    let selected: Vec<Box<dyn TestSuite>> = match args.suite {
        Some(ref name) => match settings::resolve_suite(name) {
            Ok(s) => vec![s],
            Err(msg) => {
                eprintln!("Error: {}", msg);
                return exit_codes::INPUT_ERROR;
            }
        },
        None => suites(),
    };

    let listings: Vec<SuiteListing> = selected
        .iter()
        .map(|s| SuiteListing {
            suite: s.name(),
            description: s.description(),
            tests: s.invocations(),
        })
        .collect();

    if args.json {
        return match output::to_json(&listings, false)
            .and_then(|json| output::write_output(&json, None))
        {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                exit_codes::EXECUTION_ERROR
            }
        };
    }

    for listing in &listings {
        println!("{}: {}", listing.suite, listing.description);
        for inv in &listing.tests {
            println!(
                "  {:<24}{:<10}CH{:<4}{}",
                inv.identity.test,
                inv.test_level.as_str(),
                inv.channel_count,
                inv.binary_path.display()
            );
        }
    }

    exit_codes::SUCCESS
}
