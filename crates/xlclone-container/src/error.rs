//! Container error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for container operations
pub type ContainerResult<T> = std::result::Result<T, ContainerError>;

/// Errors from package unpacking, packing, and scratch management.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The file is not a readable zip package. Covers unopenable files,
    /// zip parse failures, and unreadable entries alike: from the caller's
    /// viewpoint the container is simply not valid.
    #[error("invalid container {path}: {reason}")]
    InvalidContainer {
        /// The offending file.
        path: PathBuf,
        /// What went wrong reading it.
        reason: String,
    },

    /// An output package could not be written.
    #[error("failed to write package {path}: {reason}")]
    PackWrite {
        /// The destination file.
        path: PathBuf,
        /// What went wrong writing it.
        reason: String,
    },

    /// IO error outside of pack/unpack, e.g. while walking a tree.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
