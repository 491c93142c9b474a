//! Probe error types.

use crate::toolchain::ToolchainError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Which half of the build a [`ProbeError::CompileFailed`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Compile,
    Link,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStage::Compile => write!(f, "compilation"),
            BuildStage::Link => write!(f, "linking"),
        }
    }
}

/// Everything that can stop a probe. Cleanup failures never show up here.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// No compiler could be located for the requested toolchain.
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    /// The probe source could not be placed in the working directory.
    #[error("Failed to stage probe source into {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiler or linker could not run or exited non-zero.
    #[error("Probe {stage} failed: {command}\n{output}")]
    CompileFailed {
        stage: BuildStage,
        command: String,
        output: String,
    },

    /// Library install names in the binary could not be rewritten.
    #[error("Failed to patch library paths: {0}")]
    PathPatchFailed(String),

    /// The probe executable could not be started.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The probe executable exited non-zero.
    #[error("Error running version detection script (exit code {code:?}):\n{stdout}\n{stderr}")]
    ExecutionFailed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The probe executable outlived the configured timeout and was killed.
    #[error("{program} did not finish within {timeout:?}")]
    ExecutionTimedOut { program: PathBuf, timeout: Duration },

    /// A line of probe output could not be decoded.
    #[error("Could not parse probe output line '{line}': {reason}")]
    ParseFailed { line: String, reason: String },
}
