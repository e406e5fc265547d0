//! The document-host port
//!
//! Everything a cloning strategy needs from the live host application,
//! expressed as a flat, handle-based trait so engines and tests can run
//! against scripted hosts. The real implementation drives an Excel COM
//! bridge process; the raw attribute shapes here mirror that wire protocol
//! one to one, codes untranslated.

use std::path::Path;

use thiserror::Error;

use crate::region::{RangeData, UsedRegion};

/// Opaque handle to one open document inside the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// One open document as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    /// Handle for subsequent calls.
    pub id: DocumentId,
    /// Display name, extension included.
    pub name: String,
    /// Whether this is the host's active document.
    pub active: bool,
}

/// Host-side failure classes.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host application cannot be reached, or the transport to it died.
    #[error("document host unavailable: {0}")]
    Unavailable(String),

    /// A single automation operation failed host-side.
    #[error("host operation failed: {0}")]
    Operation(String),

    /// The host sent a reply the client cannot interpret.
    #[error("unexpected host reply: {0}")]
    Protocol(String),
}

impl HostError {
    /// Fatal errors abort the whole run. Everything else is recoverable at
    /// the call site: the attribute simply goes unread, or the strategy
    /// yields to the next one.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HostError::Unavailable(_) | HostError::Protocol(_))
    }
}

/// Raw font attributes, host codes untranslated.
///
/// Every field is optional; the bridge omits whatever it could not read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawFont {
    /// Font family name.
    pub name: Option<String>,
    /// Size in points.
    pub size: Option<f64>,
    /// Bold flag.
    pub bold: Option<bool>,
    /// Italic flag.
    pub italic: Option<bool>,
    /// Strikethrough flag.
    pub strikethrough: Option<bool>,
    /// `xlUnderlineStyle*` code.
    pub underline: Option<i32>,
    /// Packed `0xBBGGRR` color.
    pub color: Option<i64>,
}

/// Raw interior (fill) attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawInterior {
    /// `xlPattern*` code.
    pub pattern: Option<i32>,
    /// Packed `0xBBGGRR` color.
    pub color: Option<i64>,
}

/// Raw alignment attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawAlignment {
    /// `xlHAlign*` code.
    pub horizontal: Option<i32>,
    /// `xlVAlign*` code.
    pub vertical: Option<i32>,
    /// Wrap flag.
    pub wrap_text: Option<bool>,
    /// Orientation: a degree angle or a magic constant.
    pub orientation: Option<i32>,
    /// Indent level.
    pub indent_level: Option<i32>,
}

/// Raw borders, one optional edge per side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawBorders {
    /// Left edge.
    pub left: Option<RawBorderEdge>,
    /// Right edge.
    pub right: Option<RawBorderEdge>,
    /// Top edge.
    pub top: Option<RawBorderEdge>,
    /// Bottom edge.
    pub bottom: Option<RawBorderEdge>,
}

/// One raw border edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBorderEdge {
    /// Resolved line-style code, 1-13 or a sentinel.
    pub line_style: i32,
    /// Packed `0xBBGGRR` color.
    pub color: Option<i64>,
}

/// Read access to the live host application.
///
/// All methods block. Per-cell reads are remote calls and priced
/// accordingly: strategies take one bulk [`region_values`] read per sheet
/// and fall back to per-cell calls only for style facets.
///
/// Sheet indices are 0-based; rows, columns, and merge coordinates are
/// 1-based, matching the host's own numbering.
///
/// [`region_values`]: DocumentHost::region_values
pub trait DocumentHost {
    /// Enumerate the host's open documents.
    fn list_documents(&self) -> Result<Vec<DocumentInfo>, HostError>;

    /// Open a document from disk read-only, leaving any copy the user
    /// already has open undisturbed.
    fn open_readonly(&self, path: &Path) -> Result<DocumentId, HostError>;

    /// Close a document without saving changes.
    fn close_without_saving(&self, doc: DocumentId) -> Result<(), HostError>;

    /// Ask the host itself to write a copy of the document to `dest`.
    fn save_copy(&self, doc: DocumentId, dest: &Path) -> Result<(), HostError>;

    /// Sheet names in workbook order.
    fn sheet_names(&self, doc: DocumentId) -> Result<Vec<String>, HostError>;

    /// The sheet's used region, or `None` for an unpopulated sheet.
    fn used_region(&self, doc: DocumentId, sheet: u32) -> Result<Option<UsedRegion>, HostError>;

    /// One bulk value read covering the sheet's whole used region.
    fn region_values(&self, doc: DocumentId, sheet: u32) -> Result<RangeData, HostError>;

    /// Font attributes of one cell.
    fn cell_font(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawFont, HostError>;

    /// Fill attributes of one cell.
    fn cell_interior(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawInterior, HostError>;

    /// Alignment attributes of one cell.
    fn cell_alignment(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawAlignment, HostError>;

    /// Number format string of one cell, `None` when unreadable.
    fn cell_number_format(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<Option<String>, HostError>;

    /// Border attributes of one cell.
    fn cell_borders(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawBorders, HostError>;

    /// The A1-style address of the merge region containing this cell, or
    /// `None` when the cell is not merged.
    fn merge_area(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<Option<String>, HostError>;

    /// Explicit width of one column, `None` to keep the output default.
    fn column_width(&self, doc: DocumentId, sheet: u32, col: u32) -> Result<Option<f64>, HostError>;

    /// Explicit height of one row, `None` to keep the output default.
    fn row_height(&self, doc: DocumentId, sheet: u32, row: u32) -> Result<Option<f64>, HostError>;
}
