//! PDM microphone front-end regression tests.
//!
//! Each channel-count build of `test_pdm_interface` is run under xsim and its
//! output compared against `pdm_interface.expect`.

use crate::discovery::channel_binary_path;
use crate::error::{Result, XTestError};
use crate::harness::Harness;
use crate::suite::TestSuite;
use crate::types::{TestIdentity, TestInvocation, TestLevel, TestOutcome};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const LIBRARY: &str = "lib_mic_array";
pub const SUITE_GROUP: &str = "lib_mic_array_frontend_tests";
pub const APP: &str = "test_pdm_interface";
pub const EXPECT_FILE: &str = "pdm_interface.expect";

/// `(channel_count, test_level)` pairs registered by [`runtest`], in order
pub const FRONTEND_TESTS: &[(u32, TestLevel)] = &[(4, TestLevel::Smoke), (8, TestLevel::Smoke)];

/// `test_pdm_interface/bin/CH<n>/test_pdm_interface_CH<n>.xe`
pub fn binary_path(channel_count: u32) -> PathBuf {
    channel_binary_path(APP, channel_count)
}

pub fn test_name(test_level: TestLevel) -> String {
    format!("frontend_test_{}", test_level)
}

pub fn invocation(channel_count: u32, test_level: TestLevel) -> Result<TestInvocation> {
    if channel_count == 0 {
        return Err(XTestError::InvalidParameter(
            "channel count must be positive".to_string(),
        ));
    }

    let mut config = BTreeMap::new();
    config.insert("channel_count".to_string(), serde_json::json!(channel_count));

    Ok(TestInvocation {
        channel_count,
        test_level,
        binary_path: binary_path(channel_count),
        expect_path: PathBuf::from(EXPECT_FILE),
        identity: TestIdentity::new(LIBRARY, SUITE_GROUP, test_name(test_level), config),
    })
}

/// Run the front-end test for one channel count.
pub async fn do_frontend_test(
    harness: &Harness,
    channel_count: u32,
    test_level: TestLevel,
) -> Result<TestOutcome> {
    let invocation = invocation(channel_count, test_level)?;
    harness.run_invocation(&invocation).await
}

/// Entry point: 4 and 8 channels at smoke level. Setup errors are already
/// registered against their test case, so the next case still runs.
pub async fn runtest(harness: &Harness) -> Vec<TestOutcome> {
    let mut outcomes = Vec::with_capacity(FRONTEND_TESTS.len());
    for &(channel_count, test_level) in FRONTEND_TESTS {
        let outcome = match do_frontend_test(harness, channel_count, test_level).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("frontend test CH{} errored: {}", channel_count, e);
                TestOutcome::Error
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

pub struct FrontendSuite;

impl TestSuite for FrontendSuite {
    fn name(&self) -> &'static str {
        "frontend"
    }

    fn description(&self) -> &'static str {
        "PDM interface front end, golden output per channel count"
    }

    fn invocations(&self) -> Vec<TestInvocation> {
        FRONTEND_TESTS
            .iter()
            .filter_map(|&(channel_count, test_level)| invocation(channel_count, test_level).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_paths() {
        assert_eq!(
            binary_path(4),
            PathBuf::from("test_pdm_interface/bin/CH4/test_pdm_interface_CH4.xe")
        );
        assert_eq!(
            binary_path(8),
            PathBuf::from("test_pdm_interface/bin/CH8/test_pdm_interface_CH8.xe")
        );
    }

    #[test]
    fn test_invocations_share_golden_file_and_level() {
        let invocations = FrontendSuite.invocations();
        assert_eq!(invocations.len(), 2);
        for inv in &invocations {
            assert_eq!(inv.expect_path, PathBuf::from("pdm_interface.expect"));
            assert_eq!(inv.test_level, TestLevel::Smoke);
            assert_eq!(inv.identity.product, "lib_mic_array");
            assert_eq!(inv.identity.group, "lib_mic_array_frontend_tests");
            assert_eq!(inv.identity.test, "frontend_test_smoke");
        }
        assert_eq!(invocations[0].channel_count, 4);
        assert_eq!(invocations[1].channel_count, 8);
        assert_eq!(invocations[1].identity.config["channel_count"], serde_json::json!(8));
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(matches!(
            invocation(0, TestLevel::Smoke),
            Err(XTestError::InvalidParameter(_))
        ));
    }
}
