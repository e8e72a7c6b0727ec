//! Simulator lookup on `$PATH`.
//!
//! Mutates the process environment, so everything lives in a single test
//! within its own test binary.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use xtest_rs::discovery::{find_simulator, require_simulator, SIMULATOR_ENV_VAR, TOOLS_HOME_ENV_VAR};
use xtest_rs::XTestError;

#[test]
fn test_path_lookup_requires_executable_simulator() {
    let home = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();
    let xsim = bin.path().join("xsim");
    fs::write(&xsim, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&xsim, fs::Permissions::from_mode(0o644)).unwrap();

    std::env::remove_var(SIMULATOR_ENV_VAR);
    std::env::remove_var(TOOLS_HOME_ENV_VAR);
    std::env::set_var("HOME", home.path());
    std::env::set_var("PATH", bin.path());

    // A plain file named xsim on $PATH is not a simulator
    assert!(find_simulator(None).is_none());
    assert!(find_simulator(Some("xsim")).is_none());
    assert!(matches!(
        require_simulator(None),
        Err(XTestError::SimulatorNotFound(_))
    ));

    fs::set_permissions(&xsim, fs::Permissions::from_mode(0o755)).unwrap();
    let found = find_simulator(None).expect("executable xsim on PATH");
    assert_eq!(found.file_name().unwrap(), "xsim");
    assert!(found.starts_with(fs::canonicalize(bin.path()).unwrap()) || found.starts_with(bin.path()));
}
