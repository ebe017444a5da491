//! Error types for MCP registration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while talking to the Windows host from inside WSL.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The helper program could not be started at all.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The helper program ran but reported failure.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The helper printed something other than the expected encoded payload.
    #[error("Unexpected output from {program}: {reason}")]
    Decode { program: String, reason: String },
}

/// Errors that abort an install instead of reporting a plain failure.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Host bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Failed to access config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize MCP config: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type InstallResult<T> = Result<T, InstallError>;
