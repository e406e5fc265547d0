use std::path::PathBuf;

use thiserror::Error;
use xlclone_container::ContainerError;
use xlclone_core::HostError;

/// Errors surfaced by a cloning run.
///
/// Strategy-internal failures (an encrypted native copy, a missing template)
/// never appear here; they are converted to
/// [`StrategyOutcome`](crate::StrategyOutcome) values that drive the
/// fallback. Only strategy exhaustion and fatal host or filesystem
/// conditions escape to the caller.
#[derive(Debug, Error)]
pub enum CloneError {
    /// Every applicable strategy was tried and reported failure.
    #[error("all strategies failed for '{document}': {}", .attempts.join("; "))]
    AllStrategiesFailed {
        document: String,
        /// One `"<strategy>: <reason>"` entry per attempt, in plan order.
        attempts: Vec<String>,
    },

    /// The host connection is gone or a reply was malformed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The output package could not be written.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Batch mode found nothing to do.
    #[error("no .xlsx files found in {}", .0.display())]
    EmptyFolder(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CloneError {
    /// True when the condition dooms every further document in this host
    /// session, not just the current one. Batch runs stop on these and
    /// tally everything else as a per-document failure.
    pub fn is_fatal_for_session(&self) -> bool {
        matches!(self, CloneError::Host(e) if e.is_fatal())
    }
}

pub type CloneResult<T> = Result<T, CloneError>;
