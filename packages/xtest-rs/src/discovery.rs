//! Locating the simulator executable and the prebuilt channel binaries.

use crate::error::{Result, XTestError};
use std::path::{Path, PathBuf};

// =============================================================================
// SIMULATOR RESOLUTION
// =============================================================================

/// Simulator executable name
pub const SIMULATOR_NAME: &str = "xsim";

/// Environment variable for explicit simulator path
pub const SIMULATOR_ENV_VAR: &str = "XSIM_PATH";

/// Environment variable for the tools installation directory
pub const TOOLS_HOME_ENV_VAR: &str = "XMOS_TOOL_PATH";

/// Default search paths (in priority order)
pub const DEFAULT_SIMULATOR_PATHS: &[&str] =
    &["~/.local/bin", "~/bin", "/usr/local/bin", "/opt/xmos/bin"];

fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Find the simulator executable.
///
/// Resolution order:
/// 1. Explicit path (if provided)
/// 2. $XSIM_PATH environment variable
/// 3. $XMOS_TOOL_PATH/bin/ directory
/// 4. Default search paths
/// 5. $PATH
pub fn find_simulator(explicit_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        let p = expand_path(path);
        if p.exists() {
            return Some(p);
        }
        // Bare program names are looked up on $PATH
        if p.components().count() == 1 {
            return which::which(path).ok();
        }
        return None;
    }

    if let Ok(env_path) = std::env::var(SIMULATOR_ENV_VAR) {
        let p = expand_path(&env_path);
        if p.exists() {
            return Some(p);
        }
        log::warn!("${} points at missing file: {}", SIMULATOR_ENV_VAR, p.display());
    }

    if let Ok(home_path) = std::env::var(TOOLS_HOME_ENV_VAR) {
        let p = expand_path(&home_path).join("bin").join(SIMULATOR_NAME);
        if p.exists() {
            return Some(p);
        }
    }

    for search_path in DEFAULT_SIMULATOR_PATHS {
        let p = expand_path(search_path).join(SIMULATOR_NAME);
        if p.exists() {
            return Some(p);
        }
    }

    which::which(SIMULATOR_NAME).ok()
}

/// Same as [`find_simulator`] but returns an error if not found.
pub fn require_simulator(explicit_path: Option<&str>) -> Result<PathBuf> {
    find_simulator(explicit_path).ok_or_else(|| {
        XTestError::SimulatorNotFound(format!(
            "'{}' not found. Pass --simulator, set ${} or ${}, or install to one of: {:?}",
            explicit_path.unwrap_or(SIMULATOR_NAME),
            SIMULATOR_ENV_VAR,
            TOOLS_HOME_ENV_VAR,
            DEFAULT_SIMULATOR_PATHS
        ))
    })
}

// =============================================================================
// CHANNEL BUILDS
// =============================================================================

/// Binary path for an application built per channel count:
/// `<app>/bin/CH<n>/<app>_CH<n>.xe`
pub fn channel_binary_path(app: &str, channel_count: u32) -> PathBuf {
    PathBuf::from(app)
        .join("bin")
        .join(format!("CH{}", channel_count))
        .join(format!("{}_CH{}.xe", app, channel_count))
}

/// Channel counts that have a built binary under `base_dir`, sorted ascending.
pub fn discover_channel_builds(base_dir: &Path, app: &str) -> Result<Vec<u32>> {
    let pattern = base_dir
        .join(app)
        .join("bin")
        .join("CH*")
        .join(format!("{}_CH*.xe", app));
    let pattern = pattern
        .to_str()
        .ok_or_else(|| XTestError::InvalidParameter(format!("Non UTF-8 path: {:?}", pattern)))?;

    let entries = glob::glob(pattern)
        .map_err(|e| XTestError::InvalidParameter(format!("Invalid glob pattern '{}': {}", pattern, e)))?;

    let mut counts = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::warn!("glob error: {}", e);
                continue;
            }
        };
        if let Some(n) = channel_count_of(&path, app) {
            // Directory and file name must agree
            if path.ends_with(channel_binary_path(app, n)) {
                counts.push(n);
            }
        }
    }
    counts.sort_unstable();
    counts.dedup();
    Ok(counts)
}

fn channel_count_of(path: &Path, app: &str) -> Option<u32> {
    path.file_stem()?
        .to_str()?
        .strip_prefix(app)?
        .strip_prefix("_CH")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_channel_binary_path() {
        assert_eq!(
            channel_binary_path("test_pdm_interface", 4),
            PathBuf::from("test_pdm_interface/bin/CH4/test_pdm_interface_CH4.xe")
        );
    }

    #[test]
    fn test_explicit_missing_simulator() {
        assert!(find_simulator(Some("/nonexistent/xsim")).is_none());
        assert!(matches!(
            require_simulator(Some("/nonexistent/xsim")),
            Err(XTestError::SimulatorNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_bare_name_resolved_on_path() {
        let found = find_simulator(Some("sh")).expect("sh should be on PATH");
        assert!(found.ends_with("sh"));
    }

    #[test]
    fn test_discover_channel_builds() {
        let tmp = tempfile::tempdir().unwrap();
        for n in [8, 4] {
            let p = tmp.path().join(channel_binary_path("test_pdm_interface", n));
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(&p, "").unwrap();
        }
        // Mismatched directory and file name is ignored
        let stray = tmp
            .path()
            .join("test_pdm_interface/bin/CH2/test_pdm_interface_CH6.xe");
        fs::create_dir_all(stray.parent().unwrap()).unwrap();
        fs::write(&stray, "").unwrap();

        let counts = discover_channel_builds(tmp.path(), "test_pdm_interface").unwrap();
        assert_eq!(counts, vec![4, 8]);
    }

    #[test]
    fn test_discover_channel_builds_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let counts = discover_channel_builds(tmp.path(), "test_pdm_interface").unwrap();
        assert!(counts.is_empty());
    }
}
