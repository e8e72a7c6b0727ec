use crate::error::{Result, XTestError};
use crate::types::{Mismatch, TestIdentity, TestLevel, TestOutcome, TestResult};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Result of comparing simulator output with the golden file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match,
    Mismatch(Mismatch),
}

/// Golden-output tester: passes only when the captured output is
/// byte-for-byte identical to the expected stream.
#[derive(Debug, Clone)]
pub struct ComparisonTester {
    expected: Vec<u8>,
    identity: TestIdentity,
    min_level: TestLevel,
}

impl ComparisonTester {
    /// Create a tester reading the expected output from `expected`.
    ///
    /// # Arguments
    /// * `expected` - Golden output stream, read to the end
    /// * `product` - Library under test, e.g. `lib_mic_array`
    /// * `group` - Test suite name
    /// * `test` - Test case name
    /// * `config` - Metadata recorded with the result, e.g. `channel_count`
    pub fn new<R: Read>(
        mut expected: R,
        product: impl Into<String>,
        group: impl Into<String>,
        test: impl Into<String>,
        config: BTreeMap<String, serde_json::Value>,
    ) -> Result<Self> {
        let mut buf = Vec::new();
        expected
            .read_to_end(&mut buf)
            .map_err(|e| XTestError::GoldenFileMissing(e.to_string()))?;
        Ok(Self::from_bytes(buf, TestIdentity::new(product, group, test, config)))
    }

    /// Open the golden file at `path`
    pub fn open<P: AsRef<Path>>(path: P, identity: TestIdentity) -> Result<Self> {
        let path = path.as_ref();
        let expected = std::fs::read(path)
            .map_err(|e| XTestError::GoldenFileMissing(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loaded golden file {} ({} bytes)", path.display(), expected.len());
        Ok(Self::from_bytes(expected, identity))
    }

    pub fn from_bytes(expected: Vec<u8>, identity: TestIdentity) -> Self {
        Self {
            expected,
            identity,
            min_level: TestLevel::default(),
        }
    }

    pub fn set_min_testlevel(&mut self, level: TestLevel) {
        self.min_level = level;
    }

    pub fn min_testlevel(&self) -> TestLevel {
        self.min_level
    }

    pub fn identity(&self) -> &TestIdentity {
        &self.identity
    }

    pub fn compare(&self, output: &[u8]) -> Comparison {
        if output == self.expected.as_slice() {
            return Comparison::Match;
        }
        Comparison::Mismatch(first_mismatch(&self.expected, output))
    }

    /// Judge captured output and build the result record for it
    pub fn judge(&self, output: &[u8]) -> TestResult {
        let comparison = self.compare(output);
        let outcome = match comparison {
            Comparison::Match => TestOutcome::Pass,
            Comparison::Mismatch(_) => TestOutcome::Fail,
        };

        let mut result = TestResult::new(&self.identity, self.min_level, outcome);
        result.output_bytes = Some(output.len());
        if let Comparison::Mismatch(mismatch) = comparison {
            log::debug!(
                "{}: line {} differs (expected {:?}, got {:?})",
                self.identity.label(),
                mismatch.line,
                mismatch.expected,
                mismatch.actual
            );
            result.mismatch = Some(mismatch);
        }
        result
    }

    pub fn skipped(&self) -> TestResult {
        TestResult::new(&self.identity, self.min_level, TestOutcome::Skipped)
    }

    pub fn errored(&self, error: &XTestError) -> TestResult {
        TestResult::new(&self.identity, self.min_level, TestOutcome::Error).with_error(error.to_string())
    }
}

fn first_mismatch(expected: &[u8], actual: &[u8]) -> Mismatch {
    let mut expected_lines = expected.split_inclusive(|&b| b == b'\n');
    let mut actual_lines = actual.split_inclusive(|&b| b == b'\n');
    let mut line = 1;

    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (Some(e), Some(a)) if e == a => line += 1,
            (e, a) => {
                return Mismatch {
                    line,
                    expected: e.map(render_line),
                    actual: a.map(render_line),
                }
            }
        }
    }
}

fn render_line(line: &[u8]) -> String {
    String::from_utf8_lossy(line).into_owned()
}
