use crate::discovery::require_simulator;
use crate::error::{Result, XTestError};
use crate::profiling::ProfileScope;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of one simulator process
#[derive(Debug, Clone)]
pub struct SimulatorOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl SimulatorOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Simulator Runner
///
/// Launches `<program> [base args] <binary> [simargs]` and captures its output.
#[derive(Debug, Clone)]
pub struct SimulatorRunner {
    program: PathBuf,
    base_args: Vec<String>,
    timeout: Option<Duration>,
}

impl SimulatorRunner {
    /// Create a runner for the simulator at `program`.
    ///
    /// The program is not checked here; use [`SimulatorRunner::discover`] to
    /// resolve and verify the executable first.
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            base_args: Vec::new(),
            timeout: None,
        }
    }

    /// Resolve the simulator via the usual search order and create a runner.
    pub fn discover(explicit_path: Option<&str>) -> Result<Self> {
        let program = require_simulator(explicit_path)?;
        log::debug!("Using simulator: {}", program.display());
        Ok(Self::new(program))
    }

    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `binary` under the simulator.
    ///
    /// # Arguments
    /// * `binary` - Simulation binary; must exist
    /// * `simargs` - Extra simulator arguments placed after the binary
    ///
    /// # Returns
    /// The captured output; a non-zero exit status is not an error here
    pub async fn run(&self, binary: &Path, simargs: &[String]) -> Result<SimulatorOutput> {
        if !binary.exists() {
            return Err(XTestError::BinaryNotFound(binary.display().to_string()));
        }

        let mut command = Command::new(&self.program);
        command
            .args(&self.base_args)
            .arg(binary)
            .args(simargs)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        log::info!("Executing simulator command: {:?}", command);

        let profile = ProfileScope::new(format!("simulate {}", binary.display()));
        let child = command.output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child).await.map_err(|_| {
                XTestError::ExecutionFailed(format!(
                    "{} timed out after {:.1}s",
                    binary.display(),
                    limit.as_secs_f64()
                ))
            })?,
            None => child.await,
        }
        .map_err(|e| {
            XTestError::ExecutionFailed(format!(
                "Failed to launch {}: {}",
                self.program.display(),
                e
            ))
        })?;
        let elapsed = profile.elapsed();

        let result = SimulatorOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code(),
            elapsed,
        };

        if !result.success() {
            log::warn!(
                "Simulator exited with status {} for {}",
                output.status,
                binary.display()
            );
            log::debug!("stderr: {}", String::from_utf8_lossy(&result.stderr));
        }

        log::debug!("Captured {} bytes of simulator output", result.stdout.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary() {
        let runner = SimulatorRunner::new("cat");
        let err = runner
            .run(Path::new("/nonexistent/test_CH4.xe"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, XTestError::BinaryNotFound(_)));
    }

    #[tokio::test]
    async fn test_unlaunchable_simulator() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = tmp.path().join("app.xe");
        std::fs::write(&binary, "x").unwrap();

        let runner = SimulatorRunner::new("/nonexistent/xsim");
        let err = runner.run(&binary, &[]).await.unwrap_err();
        assert!(matches!(err, XTestError::ExecutionFailed(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = tmp.path().join("app.xe");
        std::fs::write(&binary, "frame 0\nframe 1\n").unwrap();

        let output = SimulatorRunner::new("cat").run(&binary, &[]).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, b"frame 0\nframe 1\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("slow.sh");
        std::fs::write(&script, "sleep 5\n").unwrap();

        let runner = SimulatorRunner::new("sh").with_timeout(Some(Duration::from_millis(100)));
        let err = runner.run(&script, &[]).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
