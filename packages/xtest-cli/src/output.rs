use serde::Serialize;
use std::io::Write;
use std::path::Path;
use xtest_rs::{Summary, TestLevel, TestResult};

/// JSON report written by `xtest run`
#[derive(Serialize)]
pub struct RunReport<'a> {
    pub suite: &'a str,
    pub level: TestLevel,
    pub simulator: String,
    pub summary: Summary,
    pub results: Vec<TestResult>,
}

/// Write JSON string to stdout or a file.
pub fn write_output(json: &str, output_path: Option<&str>) -> Result<(), String> {
    match output_path {
        Some(path) => std::fs::write(Path::new(path), format!("{}\n", json))
            .map_err(|e| format!("Failed to write output file '{}': {}", path, e)),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(json.as_bytes())
                .and_then(|_| handle.write_all(b"\n"))
                .map_err(|e| format!("Failed to write to stdout: {}", e))
        }
    }
}

/// Serialize a value to JSON (pretty or compact).
pub fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String, String> {
    if compact {
        serde_json::to_string(value).map_err(|e| format!("JSON serialization failed: {}", e))
    } else {
        serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {}", e))
    }
}

/// One human-readable line per result, e.g.
/// `PASS  frontend_test_smoke  channel_count=4`
pub fn result_line(result: &TestResult) -> String {
    let config: Vec<String> = result
        .config
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    let mut line = format!("{:<8}{}  {}", result.outcome.to_string(), result.test, config.join(" "));
    if let Some(ref mismatch) = result.mismatch {
        line.push_str(&format!("  (first difference at line {})", mismatch.line));
    }
    if let Some(ref error) = result.error {
        line.push_str(&format!("  ({})", error));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use xtest_rs::{Mismatch, TestIdentity, TestOutcome};

    #[test]
    fn test_result_line() {
        let mut config = BTreeMap::new();
        config.insert("channel_count".to_string(), serde_json::json!(8));
        let identity = TestIdentity::new("lib_mic_array", "g", "frontend_test_smoke", config);
        let mut result = TestResult::new(&identity, TestLevel::Smoke, TestOutcome::Fail);
        result.mismatch = Some(Mismatch {
            line: 3,
            expected: None,
            actual: None,
        });

        let line = result_line(&result);
        assert!(line.starts_with("FAIL"));
        assert!(line.contains("frontend_test_smoke"));
        assert!(line.contains("channel_count=8"));
        assert!(line.contains("line 3"));
    }
}
