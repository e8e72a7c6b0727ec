use crate::error::{Result, XTestError};
use crate::resources::XSIM;
use crate::types::TestLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the base directory
pub const LOCAL_CONFIG_FILE: &str = "xtest.json";

/// Harness settings, loadable from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory the binary and golden-file paths are relative to
    pub base_dir: PathBuf,
    /// Overrides the suite's golden file
    pub expect_file: Option<PathBuf>,
    /// Simulator executable; discovered when unset
    pub simulator: Option<String>,
    /// Arguments placed before the binary on every simulator command line
    pub simulator_args: Vec<String>,
    /// Resource kind -> number of slots
    pub resources: BTreeMap<String, usize>,
    pub timeout_secs: Option<u64>,
    /// Depth of this run; tests above it are skipped
    pub level: TestLevel,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let mut resources = BTreeMap::new();
        resources.insert(XSIM.to_string(), 1);
        Self {
            base_dir: PathBuf::from("."),
            expect_file: None,
            simulator: None,
            simulator_args: Vec::new(),
            resources,
            timeout_secs: None,
            level: TestLevel::Smoke,
        }
    }
}

impl HarnessConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| XTestError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: HarnessConfig = serde_json::from_str(&text)
            .map_err(|e| XTestError::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, else the first existing of
    /// `<base_dir>/xtest.json` and `<config_dir>/xtest/config.json`,
    /// else defaults.
    pub fn load(explicit: Option<&Path>, base_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidates = [Some(base_dir.join(LOCAL_CONFIG_FILE)), user_config_path()];
        for candidate in candidates.into_iter().flatten() {
            if candidate.is_file() {
                return Self::from_file(candidate);
            }
        }

        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some((kind, _)) = self.resources.iter().find(|&(_, &slots)| slots == 0) {
            return Err(XTestError::Config(format!(
                "resource '{}' must have at least one slot",
                kind
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(XTestError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("xtest").join("config.json"))
}
