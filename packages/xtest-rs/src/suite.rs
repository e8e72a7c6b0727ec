use crate::frontend::FrontendSuite;
use crate::types::TestInvocation;

/// A named, data-driven family of simulator tests.
pub trait TestSuite: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Invocations in registration order, paths relative to the base directory.
    fn invocations(&self) -> Vec<TestInvocation>;
}

/// All suites the harness knows about
pub fn suites() -> Vec<Box<dyn TestSuite>> {
    vec![Box::new(FrontendSuite)]
}

pub fn find_suite(name: &str) -> Option<Box<dyn TestSuite>> {
    suites().into_iter().find(|s| s.name() == name)
}

pub fn suite_names() -> Vec<&'static str> {
    suites().iter().map(|s| s.name()).collect()
}
