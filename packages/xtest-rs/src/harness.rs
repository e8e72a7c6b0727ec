use crate::config::HarnessConfig;
use crate::error::{Result, XTestError};
use crate::registry::TestRegistry;
use crate::resources::{ResourceBroker, ResourceHandle, XSIM};
use crate::simulator::SimulatorRunner;
use crate::suite::TestSuite;
use crate::tester::ComparisonTester;
use crate::types::{TestIdentity, TestInvocation, TestLevel, TestOutcome, TestResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Everything a test routine needs: the resource pools, the simulator and the
/// result collector.
#[derive(Debug)]
pub struct Harness {
    broker: ResourceBroker,
    simulator: SimulatorRunner,
    registry: TestRegistry,
    base_dir: PathBuf,
    expect_override: Option<PathBuf>,
}

impl Harness {
    pub fn new(simulator: SimulatorRunner, broker: ResourceBroker, registry: TestRegistry) -> Self {
        Self {
            broker,
            simulator,
            registry,
            base_dir: PathBuf::from("."),
            expect_override: None,
        }
    }

    /// Build a harness from configuration, resolving the simulator executable.
    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        config.validate()?;
        let simulator = SimulatorRunner::discover(config.simulator.as_deref())?
            .with_base_args(config.simulator_args.iter().cloned())
            .with_timeout(config.timeout());
        let broker = ResourceBroker::from_capacities(&config.resources)?;

        let mut harness = Self::new(simulator, broker, TestRegistry::new(config.level))
            .with_base_dir(&config.base_dir);
        harness.expect_override = config.expect_file.clone();
        Ok(harness)
    }

    pub fn with_base_dir<P: AsRef<Path>>(mut self, base_dir: P) -> Self {
        self.base_dir = base_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_expect_override(mut self, expect_file: Option<PathBuf>) -> Self {
        self.expect_override = expect_file;
        self
    }

    pub fn registry(&self) -> &TestRegistry {
        &self.registry
    }

    pub fn broker(&self) -> &ResourceBroker {
        &self.broker
    }

    pub fn simulator(&self) -> &SimulatorRunner {
        &self.simulator
    }

    /// Paths in invocations are relative to the base directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Golden file actually used for `invocation`
    pub fn expect_path(&self, invocation: &TestInvocation) -> PathBuf {
        let expect = self.expect_override.as_ref().unwrap_or(&invocation.expect_path);
        self.resolve(expect)
    }

    pub async fn request_resource(&self, kind: &str) -> Result<ResourceHandle> {
        self.broker.request_resource(kind).await
    }

    /// Run `binary` under the simulator and judge its stdout with `tester`.
    ///
    /// The result is registered whatever happens. Tests whose minimum level is
    /// above the run level are registered as skipped without launching anything.
    pub async fn run_on_simulator(
        &self,
        resource: &ResourceHandle,
        binary: &Path,
        simargs: &[String],
        tester: &ComparisonTester,
    ) -> Result<TestOutcome> {
        if !self.registry.is_eligible(tester.min_testlevel()) {
            log::info!(
                "Skipping {} (needs level {}, running {})",
                tester.identity().label(),
                tester.min_testlevel(),
                self.registry.run_level()
            );
            return Ok(self.registry.register(tester.skipped()));
        }

        log::debug!("Running {} on '{}' resource", tester.identity().label(), resource.kind());

        match self.simulator.run(binary, simargs).await {
            Ok(output) => {
                let result = tester
                    .judge(&output.stdout)
                    .with_binary(binary.display().to_string())
                    .with_exit_code(output.exit_code)
                    .with_elapsed_ms(output.elapsed.as_secs_f64() * 1000.0);
                Ok(self.registry.register(result))
            }
            Err(e) => {
                self.registry
                    .register(tester.errored(&e).with_binary(binary.display().to_string()));
                Err(e)
            }
        }
    }

    /// Record a test that could not be set up
    pub fn register_error(
        &self,
        identity: &TestIdentity,
        min_level: TestLevel,
        binary: &Path,
        error: &XTestError,
    ) -> TestOutcome {
        log::error!("{}: {}", identity.label(), error);
        self.registry.register(
            TestResult::new(identity, min_level, TestOutcome::Error)
                .with_binary(binary.display().to_string())
                .with_error(error.to_string()),
        )
    }

    /// Acquire a simulator, load the golden file and run one invocation.
    pub async fn run_invocation(&self, invocation: &TestInvocation) -> Result<TestOutcome> {
        let binary = self.resolve(&invocation.binary_path);
        let fail = |e: XTestError| {
            self.register_error(&invocation.identity, invocation.test_level, &binary, &e);
            e
        };

        let resource = self.request_resource(XSIM).await.map_err(fail)?;

        let mut tester =
            ComparisonTester::open(self.expect_path(invocation), invocation.identity.clone())
                .map_err(fail)?;
        tester.set_min_testlevel(invocation.test_level);

        self.run_on_simulator(&resource, &binary, &[], &tester).await
    }

    /// Run every invocation of `suite` in order. A failing invocation does not
    /// stop the ones after it.
    pub async fn run_suite(&self, suite: &dyn TestSuite) -> Vec<TestOutcome> {
        let mut outcomes = Vec::new();
        for invocation in suite.invocations() {
            outcomes.push(self.run_invocation(&invocation).await.unwrap_or_else(|e| {
                log::debug!("{} errored: {}", invocation.identity.label(), e);
                TestOutcome::Error
            }));
        }
        outcomes
    }

    /// Launch every invocation of `suite` at once; the resource pools bound how
    /// many simulators actually run. Outcomes come back in completion order.
    pub async fn run_suite_concurrent(self: &Arc<Self>, suite: &dyn TestSuite) -> Vec<TestOutcome> {
        let mut tasks = JoinSet::new();
        for invocation in suite.invocations() {
            let harness = Arc::clone(self);
            tasks.spawn(async move {
                harness
                    .run_invocation(&invocation)
                    .await
                    .unwrap_or(TestOutcome::Error)
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    log::error!("Test task panicked: {}", e);
                    outcomes.push(TestOutcome::Error);
                }
            }
        }
        outcomes
    }
}
