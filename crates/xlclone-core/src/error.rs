//! Error types for xlclone-core

use thiserror::Error;

/// Errors produced by core parsing and validation.
#[derive(Debug, Error)]
pub enum Error {
    /// An A1-style address or range could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A row index is outside the worksheet bounds.
    #[error("row {0} out of bounds (max {1})")]
    RowOutOfBounds(u32, u32),

    /// A column index is outside the worksheet bounds.
    #[error("column {0} out of bounds (max {1})")]
    ColumnOutOfBounds(u32, u32),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
