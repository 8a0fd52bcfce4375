//! Error types for the scan pipeline.
//!
//! [`ParseError`] and [`ResolutionError`] are fatal: the run aborts with no
//! report. [`ClassificationWarning`] is not an error; it degrades a single
//! dependency to `UNKNOWN` and is returned alongside the results.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The manifest could not be read or is malformed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("manifest not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest has no module directive")]
    MissingModule,

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: invalid version {version:?}: {reason}")]
    InvalidVersion {
        line: usize,
        version: String,
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            line,
            message: message.into(),
        }
    }
}

/// The module resolution oracle could not produce a module list.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("failed to run {program}: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("unparsable module record after {decoded} records: {source}")]
    Decode {
        decoded: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o error capturing resolver output: {0}")]
    Io(#[from] std::io::Error),
}

/// Any fatal failure of the scan pipeline.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// A license file existed but could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationWarning {
    pub file: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for ClassificationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot read {}: {}", self.file.display(), self.reason)
    }
}
