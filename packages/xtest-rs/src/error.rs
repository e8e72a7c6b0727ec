use thiserror::Error;

#[derive(Error, Debug)]
pub enum XTestError {
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Simulation binary not found at: {0}")]
    BinaryNotFound(String),

    #[error("Golden file missing or unreadable: {0}")]
    GoldenFileMissing(String),

    #[error("Simulator not found: {0}")]
    SimulatorNotFound(String),

    #[error("Simulator execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, XTestError>;
