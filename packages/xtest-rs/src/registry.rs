use crate::types::{Summary, TestLevel, TestOutcome, TestResult};
use parking_lot::Mutex;

/// Collects results for one harness run. Append-only; safe to share between
/// concurrently running invocations.
#[derive(Debug)]
pub struct TestRegistry {
    run_level: TestLevel,
    results: Mutex<Vec<TestResult>>,
}

impl TestRegistry {
    pub fn new(run_level: TestLevel) -> Self {
        Self {
            run_level,
            results: Mutex::new(Vec::new()),
        }
    }

    pub fn run_level(&self) -> TestLevel {
        self.run_level
    }

    /// A test runs when the harness level reaches the test's minimum level.
    pub fn is_eligible(&self, min_level: TestLevel) -> bool {
        min_level <= self.run_level
    }

    pub fn register(&self, result: TestResult) -> TestOutcome {
        let outcome = result.outcome;
        match outcome {
            TestOutcome::Pass | TestOutcome::Skipped => {
                log::info!("{} {}/{} {:?}", outcome, result.group, result.test, result.config)
            }
            TestOutcome::Fail | TestOutcome::Error => {
                log::warn!("{} {}/{} {:?}", outcome, result.group, result.test, result.config)
            }
        }
        self.results.lock().push(result);
        outcome
    }

    /// Snapshot of all results in registration order
    pub fn results(&self) -> Vec<TestResult> {
        self.results.lock().clone()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_results(self.results.lock().iter())
    }
}

impl Default for TestRegistry {
    fn default() -> Self {
        Self::new(TestLevel::default())
    }
}
