use assert_cmd::Command;
use predicates::prelude::*;

fn xtest() -> Command {
    let mut cmd = Command::cargo_bin("xtest").unwrap();
    let home = std::env::temp_dir().join("xtest-cli-no-home");
    cmd.env_remove("XSIM_PATH")
        .env_remove("XTEST_LEVEL")
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

// =============================================================================
// GENERAL
// =============================================================================

#[test]
fn test_no_args_shows_help() {
    xtest()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    xtest()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xtest"));
}

#[test]
fn test_help_flag() {
    xtest()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("golden"));
}

// =============================================================================
// LIST SUBCOMMAND
// =============================================================================

#[test]
fn test_list_subcommand() {
    xtest()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("frontend"))
        .stdout(predicate::str::contains(
            "test_pdm_interface/bin/CH4/test_pdm_interface_CH4.xe",
        ))
        .stdout(predicate::str::contains(
            "test_pdm_interface/bin/CH8/test_pdm_interface_CH8.xe",
        ));
}

#[test]
fn test_list_json() {
    let output = xtest()
        .arg("list")
        .arg("--suite")
        .arg("frontend")
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let tests = parsed[0]["tests"].as_array().unwrap();
    assert_eq!(tests.len(), 2);

    let channels: Vec<u64> = tests
        .iter()
        .map(|t| t["identity"]["config"]["channel_count"].as_u64().unwrap())
        .collect();
    assert_eq!(channels, vec![4, 8]);
    for t in tests {
        assert_eq!(t["test_level"], "smoke");
        assert_eq!(t["expect_path"], "pdm_interface.expect");
        assert_eq!(t["identity"]["test"], "frontend_test_smoke");
    }
}

#[test]
fn test_list_unknown_suite() {
    xtest()
        .arg("list")
        .arg("--suite")
        .arg("backend")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown suite"));
}

// =============================================================================
// INFO SUBCOMMAND
// =============================================================================

#[test]
fn test_info_subcommand() {
    xtest()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("xtest CLI v"))
        .stdout(predicate::str::contains("Platform:"));
}

#[test]
fn test_info_json() {
    let output = xtest().arg("info").arg("--json").assert().success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed.get("cli_version").is_some());
    assert!(parsed.get("simulator_found").is_some());
    assert_eq!(parsed["simulator_name"], "xsim");
    assert_eq!(parsed["suites"][0], "frontend");
}

#[test]
fn test_info_explicit_missing_simulator() {
    let output = xtest()
        .arg("info")
        .arg("--simulator")
        .arg("/nonexistent/xsim")
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["simulator_found"], false);
}

// =============================================================================
// VALIDATE SUBCOMMAND
// =============================================================================

#[test]
fn test_validate_nonexistent_base_dir() {
    xtest()
        .arg("validate")
        .arg("--base-dir")
        .arg("/nonexistent/dir")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_validate_missing_fixtures() {
    let tmp = tempfile::tempdir().unwrap();

    xtest()
        .arg("validate")
        .arg("--base-dir")
        .arg(tmp.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("MISSING"))
        .stderr(predicate::str::contains("pdm_interface.expect"));
}

#[test]
fn test_validate_complete_tree_json() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("pdm_interface.expect"), "ok\n").unwrap();
    for n in [4, 8] {
        let dir = tmp.path().join(format!("test_pdm_interface/bin/CH{}", n));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("test_pdm_interface_CH{}.xe", n)), "ok\n").unwrap();
    }

    let output = xtest()
        .arg("validate")
        .arg("--base-dir")
        .arg(tmp.path())
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["valid"], true);
    assert_eq!(parsed["channel_builds_found"], serde_json::json!([4, 8]));
}

// =============================================================================
// RUN SUBCOMMAND (argument errors)
// =============================================================================

#[test]
fn test_run_unknown_suite() {
    xtest()
        .arg("run")
        .arg("--suite")
        .arg("backend")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_run_invalid_level() {
    xtest()
        .arg("run")
        .arg("--level")
        .arg("hourly")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown test level"));
}

#[test]
fn test_run_invalid_resource() {
    xtest()
        .arg("run")
        .arg("--resource")
        .arg("xsim=zero")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid resource"));
}

#[test]
fn test_run_missing_simulator() {
    let tmp = tempfile::tempdir().unwrap();
    xtest()
        .arg("run")
        .arg("--base-dir")
        .arg(tmp.path())
        .arg("--simulator")
        .arg("/nonexistent/xsim")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Simulator not found"));
}
