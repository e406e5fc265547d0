//! Wire types spoken between the Linux client and the Windows bridge
//! process running under WINE.
//!
//! The protocol is JSON-over-stdio: one JSON object per line in each
//! direction. Sheet indices are 0-based; rows, columns, and used-region
//! coordinates are 1-based, matching the host's own numbering. Style
//! attributes travel as raw host codes; translation happens client-side.

use serde::{Deserialize, Serialize};

/// One client-to-bridge message: an id plus the command payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Increments per request; the response echoes it back.
    pub id: u64,
    /// The command, flattened into the same JSON object.
    #[serde(flatten)]
    pub command: Command,
}

/// Everything the client may ask of the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum Command {
    /// Attach to a running Excel instance, or launch a hidden one when
    /// `allow_launch` is set. Must be the first command.
    Connect { allow_launch: bool },

    /// List the open workbooks of the attached instance.
    ListWorkbooks,

    /// Open a workbook from a file path (Windows path), read-only so any
    /// copy the user has open stays undisturbed. Returns a handle.
    OpenWorkbook { path: String, read_only: bool },

    /// Ask the host to save a copy of the workbook (Windows path). The
    /// workbook itself stays open and unmodified.
    SaveCopy { workbook: u64, dest: String },

    /// Close a workbook, discarding unsaved changes.
    CloseWorkbook { workbook: u64 },

    /// Sheet names of a workbook, in workbook order.
    SheetNames { workbook: u64 },

    /// The used region of one sheet.
    UsedRegion { workbook: u64, sheet: u32 },

    /// Bulk-read every value in the sheet's used region in one call.
    RegionValues { workbook: u64, sheet: u32 },

    /// Font attributes of one cell.
    CellFont {
        workbook: u64,
        sheet: u32,
        row: u32,
        col: u32,
    },

    /// Interior (fill) attributes of one cell.
    CellInterior {
        workbook: u64,
        sheet: u32,
        row: u32,
        col: u32,
    },

    /// Alignment attributes of one cell.
    CellAlignment {
        workbook: u64,
        sheet: u32,
        row: u32,
        col: u32,
    },

    /// Number format string of one cell.
    CellNumberFormat {
        workbook: u64,
        sheet: u32,
        row: u32,
        col: u32,
    },

    /// Border attributes of one cell, weight already resolved into a single
    /// line-style code per edge.
    CellBorders {
        workbook: u64,
        sheet: u32,
        row: u32,
        col: u32,
    },

    /// The merge area containing one cell, if any.
    MergeArea {
        workbook: u64,
        sheet: u32,
        row: u32,
        col: u32,
    },

    /// Explicit width of one column.
    ColumnWidth { workbook: u64, sheet: u32, col: u32 },

    /// Explicit height of one row.
    RowHeight { workbook: u64, sheet: u32, row: u32 },

    /// Shut down the bridge: close bridge-opened workbooks, quit the host
    /// if the bridge launched it, uninitialize COM.
    Shutdown,
}

/// A cell value crossing the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Error(CellError),
}

/// Excel error values (#DIV/0! and friends).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellError {
    pub code: String,
}

/// A bulk value read. The host returns different shapes depending on the
/// region: a lone cell is a scalar, a one-row or one-column region a flat
/// list, anything larger a row-major grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "shape", content = "cells", rename_all = "snake_case")]
pub enum RangeData {
    Scalar(CellValue),
    Row(Vec<CellValue>),
    Column(Vec<CellValue>),
    Grid(Vec<Vec<CellValue>>),
}

/// A sheet's used region, 1-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Region {
    pub first_row: u32,
    pub first_col: u32,
    pub rows: u32,
    pub cols: u32,
}

/// One open workbook of the attached host instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookInfo {
    /// Handle for subsequent commands.
    pub workbook: u64,
    /// Display name, extension included.
    pub name: String,
    /// Whether this is the active workbook.
    pub active: bool,
}

/// Result of a [`Command::Connect`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConnectInfo {
    /// True when the bridge launched a fresh hidden instance instead of
    /// attaching to a running one.
    pub launched: bool,
}

/// Raw font attributes of one cell. Fields the bridge could not read are
/// omitted; colors are packed `0xBBGGRR`, codes are host-native.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Font {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub strikethrough: Option<bool>,
    pub underline: Option<i32>,
    pub color: Option<i64>,
}

/// Raw interior attributes of one cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Interior {
    pub pattern: Option<i32>,
    pub color: Option<i64>,
}

/// Raw alignment attributes of one cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Alignment {
    pub horizontal: Option<i32>,
    pub vertical: Option<i32>,
    pub wrap_text: Option<bool>,
    pub orientation: Option<i32>,
    pub indent_level: Option<i32>,
}

/// Raw border attributes of one cell, one optional edge per side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Borders {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
}

/// One raw border edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BorderEdge {
    /// Resolved line-style code, 1-13 or a host sentinel.
    pub line_style: i32,
    /// Packed `0xBBGGRR` color.
    pub color: Option<i64>,
}

/// The merge area containing a cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeArea {
    /// A1-style address of the whole area, `None` when the cell is not
    /// merged.
    pub address: Option<String>,
}

/// One bridge-to-client message answering a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Echo of the request id being answered.
    pub id: u64,
    /// Outcome, flattened: a `status` tag plus either data or a message.
    #[serde(flatten)]
    pub result: ResponseResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ResponseResult {
    #[serde(rename = "ok")]
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<ResponseData>,
    },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Payloads carried by successful responses.
///
/// Untagged: every variant wraps exactly one required field with a name
/// unique across the enum, which is what keeps deserialization unambiguous.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    /// Result of a connect.
    Connected { connected: ConnectInfo },
    /// The open workbooks.
    Workbooks { workbooks: Vec<WorkbookInfo> },
    /// Handle to a newly opened workbook.
    WorkbookHandle { workbook: u64 },
    /// Sheet names in workbook order.
    Sheets { sheets: Vec<String> },
    /// A sheet's used region.
    Region { region: Region },
    /// Bulk values for a used region.
    Values { values: RangeData },
    /// Font attributes of one cell.
    Font { font: Font },
    /// Interior attributes of one cell.
    Interior { interior: Interior },
    /// Alignment attributes of one cell.
    Alignment { alignment: Alignment },
    /// Number format of one cell.
    NumberFormat { number_format: String },
    /// Border attributes of one cell.
    Borders { borders: Borders },
    /// The merge area containing one cell.
    Merge { merge: MergeArea },
    /// Explicit column width.
    Width { width: f64 },
    /// Explicit row height.
    Height { height: f64 },
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}
