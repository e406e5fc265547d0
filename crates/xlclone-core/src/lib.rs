//! # xlclone-core
//!
//! Core data structures for the xlclone workbook-cloning pipeline.
//!
//! This crate provides the vocabulary shared by every cloning strategy:
//!
//! - [`CellValue`] and [`RangeData`] - snapshot values as bulk-read from the host
//! - [`UsedRegion`], [`CellRange`], column-letter conversion - 1-based addressing
//! - [`CellStyle`] and friends - the formatting subset that survives a clone
//! - [`translate`] - pure conversion of host-native style codes to schema values
//! - [`DocumentHost`] - the capability port every strategy reads through
//!
//! Nothing here performs I/O; the host port is a trait so that engines and
//! tests can run against scripted hosts.
//!
//! ## Example
//!
//! ```rust
//! use xlclone_core::{column_to_letters, translate};
//!
//! // Host colors are packed 0xBBGGRR; the output schema wants 0xRRGGBB.
//! let red = translate::host_to_rgb(0x0000FF);
//! assert_eq!(red.as_u32(), 0xFF0000);
//!
//! assert_eq!(column_to_letters(28), "AB");
//! ```

pub mod column;
pub mod error;
pub mod host;
pub mod region;
pub mod style;
pub mod translate;
pub mod value;

pub use column::{column_to_letters, letters_to_column};
pub use error::{Error, Result};
pub use host::{
    DocumentHost, DocumentId, DocumentInfo, HostError, RawAlignment, RawBorderEdge, RawBorders,
    RawFont, RawInterior,
};
pub use region::{CellRange, RangeData, UsedRegion};
pub use style::{
    Alignment, BorderEdge, BorderLineStyle, CellBorders, CellStyle, Fill, FontStyle,
    HorizontalAlignment, Rgb, Underline, VerticalAlignment,
};
pub use value::{CellValue, ValueGrid};

/// Highest 1-based row index a worksheet supports.
pub const MAX_ROWS: u32 = 1_048_576;

/// Highest 1-based column index a worksheet supports.
pub const MAX_COLS: u32 = 16_384;
