//! The document-host port implementation backed by the COM bridge.

use std::path::Path;

use tracing::{debug, info};
use xlclone_core::{
    CellValue, DocumentHost, DocumentId, DocumentInfo, HostError, RangeData, RawAlignment,
    RawBorderEdge, RawBorders, RawFont, RawInterior, UsedRegion,
};
use xlclone_host_protocol::{self as proto, Command, ResponseData};

use crate::bridge::{linux_to_wine_path, BridgeError, ExcelBridge, ExcelBridgeConfig};

/// A connected Excel instance, live behind the WINE bridge.
///
/// Wire attributes come back as raw host codes; this type only reshapes
/// them onto the core port. Translation to schema values happens in the
/// engine, where failures can degrade per attribute.
pub struct ExcelHost {
    bridge: ExcelBridge,
    launched: bool,
}

impl ExcelHost {
    /// Spawn the bridge process and connect to Excel.
    ///
    /// Attaches to a running instance when there is one, and launches a
    /// hidden one only when the config allows it.
    pub fn connect(config: ExcelBridgeConfig) -> Result<Self, HostError> {
        let allow_launch = config.allow_launch;
        let bridge = ExcelBridge::start(&config).map_err(map_bridge_error)?;
        let data = bridge
            .send_command(Command::Connect { allow_launch })
            .map_err(map_bridge_error)?;
        let connected = match data {
            Some(ResponseData::Connected { connected }) => connected,
            _ => return Err(unexpected("connect status")),
        };
        if connected.launched {
            info!("launched a hidden Excel instance");
        } else {
            debug!("attached to the running Excel instance");
        }
        Ok(ExcelHost {
            bridge,
            launched: connected.launched,
        })
    }

    /// True when this session launched its own hidden instance rather than
    /// attaching to the user's.
    pub fn launched(&self) -> bool {
        self.launched
    }

    /// Shut the session down. Bridge-opened workbooks close; a launched
    /// instance quits; an attached one is left exactly as found.
    pub fn shutdown(self) -> Result<(), HostError> {
        self.bridge.shutdown().map_err(map_bridge_error)
    }

    fn command(&self, command: Command) -> Result<Option<ResponseData>, HostError> {
        self.bridge.send_command(command).map_err(map_bridge_error)
    }
}

impl DocumentHost for ExcelHost {
    fn list_documents(&self) -> Result<Vec<DocumentInfo>, HostError> {
        match self.command(Command::ListWorkbooks)? {
            Some(ResponseData::Workbooks { workbooks }) => Ok(workbooks
                .into_iter()
                .map(|w| DocumentInfo {
                    id: DocumentId(w.workbook),
                    name: w.name,
                    active: w.active,
                })
                .collect()),
            _ => Err(unexpected("workbook list")),
        }
    }

    fn open_readonly(&self, path: &Path) -> Result<DocumentId, HostError> {
        match self.command(Command::OpenWorkbook {
            path: linux_to_wine_path(path),
            read_only: true,
        })? {
            Some(ResponseData::WorkbookHandle { workbook }) => Ok(DocumentId(workbook)),
            _ => Err(unexpected("workbook handle")),
        }
    }

    fn close_without_saving(&self, doc: DocumentId) -> Result<(), HostError> {
        self.command(Command::CloseWorkbook { workbook: doc.0 })?;
        Ok(())
    }

    fn save_copy(&self, doc: DocumentId, dest: &Path) -> Result<(), HostError> {
        self.command(Command::SaveCopy {
            workbook: doc.0,
            dest: linux_to_wine_path(dest),
        })?;
        Ok(())
    }

    fn sheet_names(&self, doc: DocumentId) -> Result<Vec<String>, HostError> {
        match self.command(Command::SheetNames { workbook: doc.0 })? {
            Some(ResponseData::Sheets { sheets }) => Ok(sheets),
            _ => Err(unexpected("sheet names")),
        }
    }

    fn used_region(&self, doc: DocumentId, sheet: u32) -> Result<Option<UsedRegion>, HostError> {
        match self.command(Command::UsedRegion {
            workbook: doc.0,
            sheet,
        })? {
            Some(ResponseData::Region { region }) => Ok(Some(UsedRegion::new(
                region.first_row,
                region.first_col,
                region.rows,
                region.cols,
            ))),
            _ => Err(unexpected("used region")),
        }
    }

    fn region_values(&self, doc: DocumentId, sheet: u32) -> Result<RangeData, HostError> {
        match self.command(Command::RegionValues {
            workbook: doc.0,
            sheet,
        })? {
            Some(ResponseData::Values { values }) => Ok(convert_range(values)),
            _ => Err(unexpected("region values")),
        }
    }

    fn cell_font(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawFont, HostError> {
        match self.command(Command::CellFont {
            workbook: doc.0,
            sheet,
            row,
            col,
        })? {
            Some(ResponseData::Font { font }) => Ok(convert_font(font)),
            _ => Err(unexpected("font")),
        }
    }

    fn cell_interior(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawInterior, HostError> {
        match self.command(Command::CellInterior {
            workbook: doc.0,
            sheet,
            row,
            col,
        })? {
            Some(ResponseData::Interior { interior }) => Ok(RawInterior {
                pattern: interior.pattern,
                color: interior.color,
            }),
            _ => Err(unexpected("interior")),
        }
    }

    fn cell_alignment(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawAlignment, HostError> {
        match self.command(Command::CellAlignment {
            workbook: doc.0,
            sheet,
            row,
            col,
        })? {
            Some(ResponseData::Alignment { alignment }) => Ok(RawAlignment {
                horizontal: alignment.horizontal,
                vertical: alignment.vertical,
                wrap_text: alignment.wrap_text,
                orientation: alignment.orientation,
                indent_level: alignment.indent_level,
            }),
            _ => Err(unexpected("alignment")),
        }
    }

    fn cell_number_format(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<Option<String>, HostError> {
        match self.command(Command::CellNumberFormat {
            workbook: doc.0,
            sheet,
            row,
            col,
        })? {
            Some(ResponseData::NumberFormat { number_format }) => Ok(Some(number_format)),
            _ => Err(unexpected("number format")),
        }
    }

    fn cell_borders(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawBorders, HostError> {
        match self.command(Command::CellBorders {
            workbook: doc.0,
            sheet,
            row,
            col,
        })? {
            Some(ResponseData::Borders { borders }) => Ok(RawBorders {
                left: borders.left.map(convert_edge),
                right: borders.right.map(convert_edge),
                top: borders.top.map(convert_edge),
                bottom: borders.bottom.map(convert_edge),
            }),
            _ => Err(unexpected("borders")),
        }
    }

    fn merge_area(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<Option<String>, HostError> {
        match self.command(Command::MergeArea {
            workbook: doc.0,
            sheet,
            row,
            col,
        })? {
            Some(ResponseData::Merge { merge }) => Ok(merge.address),
            _ => Err(unexpected("merge area")),
        }
    }

    fn column_width(&self, doc: DocumentId, sheet: u32, col: u32) -> Result<Option<f64>, HostError> {
        match self.command(Command::ColumnWidth {
            workbook: doc.0,
            sheet,
            col,
        })? {
            // hidden columns report zero width; keep the output default
            Some(ResponseData::Width { width }) => Ok((width > 0.0).then_some(width)),
            _ => Err(unexpected("column width")),
        }
    }

    fn row_height(&self, doc: DocumentId, sheet: u32, row: u32) -> Result<Option<f64>, HostError> {
        match self.command(Command::RowHeight {
            workbook: doc.0,
            sheet,
            row,
        })? {
            Some(ResponseData::Height { height }) => Ok((height > 0.0).then_some(height)),
            _ => Err(unexpected("row height")),
        }
    }
}

fn map_bridge_error(err: BridgeError) -> HostError {
    match err {
        // an error response: the operation failed but the host is still up
        BridgeError::BridgeError(message) => HostError::Operation(message),
        BridgeError::UnexpectedResponse => {
            HostError::Protocol("unexpected response data".to_string())
        }
        other => HostError::Unavailable(other.to_string()),
    }
}

fn unexpected(what: &str) -> HostError {
    HostError::Protocol(format!("reply carried no {what}"))
}

fn convert_value(value: proto::CellValue) -> CellValue {
    match value {
        proto::CellValue::Null => CellValue::Blank,
        proto::CellValue::Bool(b) => CellValue::Bool(b),
        proto::CellValue::Number(n) => CellValue::Number(n),
        proto::CellValue::String(s) => CellValue::Text(s),
        // error cells have no portable value and land blank
        proto::CellValue::Error(_) => CellValue::Blank,
    }
}

fn convert_range(data: proto::RangeData) -> RangeData {
    match data {
        proto::RangeData::Scalar(v) => RangeData::Scalar(convert_value(v)),
        proto::RangeData::Row(cells) => {
            RangeData::Row(cells.into_iter().map(convert_value).collect())
        }
        proto::RangeData::Column(cells) => {
            RangeData::Column(cells.into_iter().map(convert_value).collect())
        }
        proto::RangeData::Grid(rows) => RangeData::Grid(
            rows.into_iter()
                .map(|row| row.into_iter().map(convert_value).collect())
                .collect(),
        ),
    }
}

fn convert_font(font: proto::Font) -> RawFont {
    RawFont {
        name: font.name,
        size: font.size,
        bold: font.bold,
        italic: font.italic,
        strikethrough: font.strikethrough,
        underline: font.underline,
        color: font.color,
    }
}

fn convert_edge(edge: proto::BorderEdge) -> RawBorderEdge {
    RawBorderEdge {
        line_style: edge.line_style,
        color: edge.color,
    }
}
