use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Test depth, ordered from the quickest pass to the most exhaustive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestLevel {
    #[default]
    Smoke,
    Nightly,
    Weekend,
}

impl TestLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::Nightly => "nightly",
            Self::Weekend => "weekend",
        }
    }
}

impl fmt::Display for TestLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smoke" => Ok(Self::Smoke),
            "nightly" => Ok(Self::Nightly),
            "weekend" => Ok(Self::Weekend),
            other => Err(format!(
                "Unknown test level '{}'. Expected one of: smoke, nightly, weekend",
                other
            )),
        }
    }
}

/// Names a registered test case the way the result collector groups it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestIdentity {
    pub product: String,
    pub group: String,
    pub test: String,
    pub config: BTreeMap<String, serde_json::Value>,
}

impl TestIdentity {
    pub fn new(
        product: impl Into<String>,
        group: impl Into<String>,
        test: impl Into<String>,
        config: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            product: product.into(),
            group: group.into(),
            test: test.into(),
            config,
        }
    }

    /// `product/group/test` followed by the metadata, e.g.
    /// `lib_mic_array/lib_mic_array_frontend_tests/frontend_test_smoke(channel_count=4)`
    pub fn label(&self) -> String {
        let config: Vec<String> = self
            .config
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!(
            "{}/{}/{}({})",
            self.product,
            self.group,
            self.test,
            config.join(",")
        )
    }
}

/// One simulator run, built right before it executes.
#[derive(Debug, Clone, Serialize)]
pub struct TestInvocation {
    pub channel_count: u32,
    pub test_level: TestLevel,
    pub binary_path: PathBuf,
    pub expect_path: PathBuf,
    pub identity: TestIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    Pass,
    Fail,
    Skipped,
    Error,
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skipped => "SKIPPED",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// First point where simulator output departs from the golden file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// 1-based line number
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// A registered test result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub id: String,
    pub product: String,
    pub group: String,
    pub test: String,
    pub config: BTreeMap<String, serde_json::Value>,
    pub min_level: TestLevel,
    pub outcome: TestOutcome,
    pub binary: Option<String>,
    pub output_bytes: Option<usize>,
    pub mismatch: Option<Mismatch>,
    pub error: Option<String>,
    pub exit_code: Option<i32>,
    pub elapsed_ms: Option<f64>,
    pub created_at: String,
}

impl TestResult {
    pub fn new(identity: &TestIdentity, min_level: TestLevel, outcome: TestOutcome) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            product: identity.product.clone(),
            group: identity.group.clone(),
            test: identity.test.clone(),
            config: identity.config.clone(),
            min_level,
            outcome,
            binary: None,
            output_bytes: None,
            mismatch: None,
            error: None,
            exit_code: None,
            elapsed_ms: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_exit_code(mut self, exit_code: Option<i32>) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn with_elapsed_ms(mut self, elapsed_ms: f64) -> Self {
        self.elapsed_ms = Some(elapsed_ms);
        self
    }

    /// Metadata value lookup, e.g. `channel_count`
    pub fn config_u64(&self, key: &str) -> Option<u64> {
        self.config.get(key).and_then(|v| v.as_u64())
    }
}

/// Aggregate counts over a set of results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl Summary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a TestResult>) -> Self {
        let mut summary = Summary::default();
        for result in results {
            summary.total += 1;
            match result.outcome {
                TestOutcome::Pass => summary.passed += 1,
                TestOutcome::Fail => summary.failed += 1,
                TestOutcome::Skipped => summary.skipped += 1,
                TestOutcome::Error => summary.errored += 1,
            }
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}
