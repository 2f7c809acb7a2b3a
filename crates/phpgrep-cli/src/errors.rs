//! Error types for the command-line runtime.

use std::io;
use std::path::PathBuf;

use phpgrep::PhpgrepError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("{0}")]
    Pattern(PhpgrepError),
    #[error("{0}")]
    Parser(PhpgrepError),
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write output: {0}")]
    Write(io::Error),
    #[error("failed to serialise match: {0}")]
    Serialise(serde_json::Error),
}

impl AppError {
    /// Errors that only affect one input path; the search carries on with
    /// the remaining paths.
    pub(crate) const fn is_per_path(&self) -> bool {
        matches!(self, Self::Read { .. })
    }
}
