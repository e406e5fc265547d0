//! Excel automation built on the IDispatch wrapper.
//!
//! Reads only: the bridge never writes a cell of a workbook it attached to.
//! Style attributes leave this module as raw host codes; the client owns the
//! translation tables.

#![cfg(windows)]

use std::collections::{HashMap, HashSet};

use windows::Win32::System::Variant::VARIANT;

use xlclone_host_protocol::{
    Alignment, BorderEdge, Borders, CellError, CellValue, Font, Interior, MergeArea, RangeData,
    Region, WorkbookInfo,
};

use crate::dispatch::{
    variant_bool, variant_get_bool, variant_get_error_code, variant_get_f64, variant_get_string,
    variant_i32, variant_is_array, variant_is_empty, variant_missing, variant_str,
    variant_to_grid, DispatchObject,
};

// xlBordersIndex values for the four outer edges of a cell.
const XL_EDGE_LEFT: i32 = 7;
const XL_EDGE_TOP: i32 = 8;
const XL_EDGE_BOTTOM: i32 = 9;
const XL_EDGE_RIGHT: i32 = 10;

// xlLineStyle constants.
const XL_LINE_CONTINUOUS: i32 = 1;
const XL_LINE_DASH: i32 = -4115;
const XL_LINE_DASH_DOT: i32 = 4;
const XL_LINE_DASH_DOT_DOT: i32 = 5;
const XL_LINE_DOT: i32 = -4118;
const XL_LINE_DOUBLE: i32 = -4119;
const XL_LINE_SLANT_DASH_DOT: i32 = 13;

// xlBorderWeight constants.
const XL_WEIGHT_HAIRLINE: i32 = 1;
const XL_WEIGHT_MEDIUM: i32 = -4138;
const XL_WEIGHT_THICK: i32 = 4;

/// Holds an Excel.Application instance and tracks its open workbooks.
pub struct ExcelApp {
    app: DispatchObject,
    workbooks_collection: DispatchObject,
    /// Workbook dispatch objects keyed by the handles given to the client.
    workbooks: HashMap<u64, DispatchObject>,
    /// Handles of workbooks this bridge opened itself. Only these are closed
    /// on shutdown; the user's own workbooks are never touched.
    opened_here: HashSet<u64>,
    next_handle: u64,
    launched: bool,
}

impl ExcelApp {
    /// Attach to the running Excel instance, or launch a hidden one when
    /// `allow_launch` is set.
    pub fn connect(allow_launch: bool) -> Result<Self, String> {
        if let Some(app) = DispatchObject::attach_from_progid("Excel.Application")? {
            // An attached instance belongs to the user: leave Visible,
            // DisplayAlerts and everything else exactly as found.
            return Self::with_app(app, false);
        }

        if !allow_launch {
            return Err(
                "no running Excel instance to attach to, and launching is disabled".to_string(),
            );
        }

        let app = DispatchObject::create_from_progid("Excel.Application")?;

        // A launched instance stays invisible and silent
        app.set_property("Visible", variant_bool(false))?;
        app.set_property("DisplayAlerts", variant_bool(false))?;
        app.set_property("ScreenUpdating", variant_bool(false))?;

        Self::with_app(app, true)
    }

    fn with_app(app: DispatchObject, launched: bool) -> Result<Self, String> {
        let workbooks_collection = app.get_child("Workbooks")?;
        Ok(Self {
            app,
            workbooks_collection,
            workbooks: HashMap::new(),
            opened_here: HashSet::new(),
            next_handle: 1,
            launched,
        })
    }

    /// Whether this bridge launched the instance (as opposed to attaching).
    pub fn launched(&self) -> bool {
        self.launched
    }

    /// List the workbooks currently open in the instance, registering a
    /// handle for each.
    pub fn list_workbooks(&mut self) -> Result<Vec<WorkbookInfo>, String> {
        let count = required_f64(&self.workbooks_collection, "Count")? as i32;

        // ActiveWorkbook is absent when nothing is open.
        let active_name = self
            .app
            .get_child("ActiveWorkbook")
            .ok()
            .and_then(|wb| prop_string(&wb, "Name"));

        let mut infos = Vec::with_capacity(count.max(0) as usize);
        for i in 1..=count {
            let wb = self
                .workbooks_collection
                .get_indexed("Item", &[variant_i32(i)])?;
            let name = required_string(&wb, "Name")?;
            let active = active_name.as_deref() == Some(name.as_str());
            let handle = self.register(wb);
            infos.push(WorkbookInfo {
                workbook: handle,
                name,
                active,
            });
        }
        Ok(infos)
    }

    /// Open a workbook from a path, returning a fresh handle.
    pub fn open_workbook(&mut self, path: &str, read_only: bool) -> Result<u64, String> {
        // Open(Filename, UpdateLinks, ReadOnly); UpdateLinks is skipped.
        let wb = self.workbooks_collection.invoke_child(
            "Open",
            &[variant_str(path), variant_missing(), variant_bool(read_only)],
        )?;
        let handle = self.register(wb);
        self.opened_here.insert(handle);
        Ok(handle)
    }

    /// Ask the host to save a copy of the workbook. The workbook itself
    /// stays open and its dirty state is untouched.
    pub fn save_copy(&self, wb_handle: u64, dest: &str) -> Result<(), String> {
        let wb = self.workbook(wb_handle)?;
        wb.invoke_method("SaveCopyAs", &[variant_str(dest)])?;
        Ok(())
    }

    /// Close a workbook, discarding unsaved changes.
    pub fn close_workbook(&mut self, wb_handle: u64) -> Result<(), String> {
        let wb = self
            .workbooks
            .remove(&wb_handle)
            .ok_or_else(|| format!("Unknown workbook handle: {wb_handle}"))?;
        self.opened_here.remove(&wb_handle);
        wb.invoke_method("Close", &[variant_bool(false)])?;
        Ok(())
    }

    /// Sheet names of a workbook, in tab order. Worksheets only; chart
    /// sheets have no cells to clone.
    pub fn sheet_names(&self, wb_handle: u64) -> Result<Vec<String>, String> {
        let sheets = self.workbook(wb_handle)?.get_child("Worksheets")?;
        let count = required_f64(&sheets, "Count")? as i32;
        let mut names = Vec::with_capacity(count.max(0) as usize);
        for i in 1..=count {
            let sheet = sheets.get_indexed("Item", &[variant_i32(i)])?;
            names.push(required_string(&sheet, "Name")?);
        }
        Ok(names)
    }

    /// The used region of one sheet, 1-based.
    pub fn used_region(&self, wb_handle: u64, sheet: u32) -> Result<Region, String> {
        let used = self.get_sheet(wb_handle, sheet)?.get_child("UsedRange")?;
        let first_row = required_f64(&used, "Row")? as u32;
        let first_col = required_f64(&used, "Column")? as u32;
        let rows = required_f64(&used.get_child("Rows")?, "Count")? as u32;
        let cols = required_f64(&used.get_child("Columns")?, "Count")? as u32;
        Ok(Region {
            first_row,
            first_col,
            rows,
            cols,
        })
    }

    /// Bulk-read every value in the sheet's used region in one COM call.
    pub fn region_values(&self, wb_handle: u64, sheet: u32) -> Result<RangeData, String> {
        let used = self.get_sheet(wb_handle, sheet)?.get_child("UsedRange")?;

        // Value2 skips the VT_DATE detour: dates arrive as serial numbers.
        let value = used.get_property("Value2")?;
        if !variant_is_array(&value) {
            // A single-cell used range comes back as a plain scalar.
            return Ok(RangeData::Scalar(variant_to_cell_value(&value)));
        }

        let grid = variant_to_grid(&value)?;
        let rows: Vec<Vec<CellValue>> = grid
            .iter()
            .map(|row| row.iter().map(variant_to_cell_value).collect())
            .collect();
        Ok(classify_range(rows))
    }

    /// Font attributes of one cell, raw host codes.
    pub fn cell_font(
        &self,
        wb_handle: u64,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<Font, String> {
        let font = self.get_cell(wb_handle, sheet, row, col)?.get_child("Font")?;
        Ok(Font {
            name: prop_string(&font, "Name"),
            size: prop_f64(&font, "Size"),
            bold: prop_bool(&font, "Bold"),
            italic: prop_bool(&font, "Italic"),
            strikethrough: prop_bool(&font, "Strikethrough"),
            underline: prop_i32(&font, "Underline"),
            color: prop_i64(&font, "Color"),
        })
    }

    /// Interior (fill) attributes of one cell, raw host codes.
    pub fn cell_interior(
        &self,
        wb_handle: u64,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<Interior, String> {
        let interior = self
            .get_cell(wb_handle, sheet, row, col)?
            .get_child("Interior")?;
        Ok(Interior {
            pattern: prop_i32(&interior, "Pattern"),
            color: prop_i64(&interior, "Color"),
        })
    }

    /// Alignment attributes of one cell, raw host codes.
    pub fn cell_alignment(
        &self,
        wb_handle: u64,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<Alignment, String> {
        let cell = self.get_cell(wb_handle, sheet, row, col)?;
        Ok(Alignment {
            horizontal: prop_i32(&cell, "HorizontalAlignment"),
            vertical: prop_i32(&cell, "VerticalAlignment"),
            wrap_text: prop_bool(&cell, "WrapText"),
            orientation: prop_i32(&cell, "Orientation"),
            indent_level: prop_i32(&cell, "IndentLevel"),
        })
    }

    /// Number format string of one cell ("General" for the default).
    pub fn cell_number_format(
        &self,
        wb_handle: u64,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<String, String> {
        let cell = self.get_cell(wb_handle, sheet, row, col)?;
        required_string(&cell, "NumberFormat")
    }

    /// Border attributes of one cell. Edges with no line are omitted.
    pub fn cell_borders(
        &self,
        wb_handle: u64,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<Borders, String> {
        let borders = self
            .get_cell(wb_handle, sheet, row, col)?
            .get_child("Borders")?;
        Ok(Borders {
            left: border_edge(&borders, XL_EDGE_LEFT),
            right: border_edge(&borders, XL_EDGE_RIGHT),
            top: border_edge(&borders, XL_EDGE_TOP),
            bottom: border_edge(&borders, XL_EDGE_BOTTOM),
        })
    }

    /// The merge area containing one cell, if the cell is merged.
    pub fn merge_area(
        &self,
        wb_handle: u64,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<MergeArea, String> {
        let cell = self.get_cell(wb_handle, sheet, row, col)?;
        if !prop_bool(&cell, "MergeCells").unwrap_or(false) {
            return Ok(MergeArea { address: None });
        }
        let area = cell.get_child("MergeArea")?;
        Ok(MergeArea {
            address: Some(required_string(&area, "Address")?),
        })
    }

    /// Width of one column in character units. Zero for hidden columns.
    pub fn column_width(&self, wb_handle: u64, sheet: u32, col: u32) -> Result<f64, String> {
        let column = self
            .get_sheet(wb_handle, sheet)?
            .get_indexed("Columns", &[variant_i32(col as i32)])?;
        required_f64(&column, "ColumnWidth")
    }

    /// Height of one row in points. Zero for hidden rows.
    pub fn row_height(&self, wb_handle: u64, sheet: u32, row: u32) -> Result<f64, String> {
        let row_obj = self
            .get_sheet(wb_handle, sheet)?
            .get_indexed("Rows", &[variant_i32(row as i32)])?;
        required_f64(&row_obj, "RowHeight")
    }

    /// Shut down: close workbooks this bridge opened, then quit the
    /// instance only if this bridge launched it.
    pub fn shutdown(mut self) -> Result<(), String> {
        let handles: Vec<u64> = self.opened_here.iter().copied().collect();
        for h in handles {
            let _ = self.close_workbook(h);
        }
        if self.launched {
            self.app.invoke_method("Quit", &[])?;
        }
        Ok(())
    }

    /// Get a worksheet from a workbook by 0-based index.
    fn get_sheet(&self, wb_handle: u64, sheet: u32) -> Result<DispatchObject, String> {
        let sheets = self.workbook(wb_handle)?.get_child("Worksheets")?;
        // Worksheet indices on the wire are 0-based; Excel's are 1-based
        sheets.get_indexed("Item", &[variant_i32(sheet as i32 + 1)])
    }

    /// Get a single-cell Range object via Cells(row, col).
    fn get_cell(
        &self,
        wb_handle: u64,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<DispatchObject, String> {
        let ws = self.get_sheet(wb_handle, sheet)?;
        ws.get_indexed("Cells", &[variant_i32(row as i32), variant_i32(col as i32)])
    }

    fn workbook(&self, wb_handle: u64) -> Result<&DispatchObject, String> {
        self.workbooks
            .get(&wb_handle)
            .ok_or_else(|| format!("Unknown workbook handle: {wb_handle}"))
    }

    fn register(&mut self, wb: DispatchObject) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.workbooks.insert(handle, wb);
        handle
    }
}

/// Pick the wire shape for a rectangular value read.
fn classify_range(mut rows: Vec<Vec<CellValue>>) -> RangeData {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    if height == 1 && width == 1 {
        RangeData::Scalar(rows.remove(0).remove(0))
    } else if height == 1 {
        RangeData::Row(rows.remove(0))
    } else if width == 1 {
        RangeData::Column(rows.into_iter().map(|mut r| r.remove(0)).collect())
    } else {
        RangeData::Grid(rows)
    }
}

/// Read one border edge, collapsing Excel's (LineStyle, Weight) pair into
/// the single line-style code carried on the wire. `None` when the edge has
/// no line.
fn border_edge(borders: &DispatchObject, edge: i32) -> Option<BorderEdge> {
    let edge_obj = borders.get_indexed("Item", &[variant_i32(edge)]).ok()?;
    let line = prop_i32(&edge_obj, "LineStyle")?;
    let weight = prop_i32(&edge_obj, "Weight").unwrap_or(2);
    let line_style = resolve_line_style(line, weight)?;
    Some(BorderEdge {
        line_style,
        color: prop_i64(&edge_obj, "Color"),
    })
}

/// Map (xlLineStyle, xlBorderWeight) to the wire's single style code:
/// 1 thin, 2 medium, 3 dashed, 4 dotted, 5 thick, 6 double, 7 hair,
/// 8 medium-dashed, 9 dash-dot, 10 medium-dash-dot, 11 dash-dot-dot,
/// 12 medium-dash-dot-dot, 13 slant-dash-dot. `None` for xlLineStyleNone
/// and anything unrecognized.
fn resolve_line_style(line: i32, weight: i32) -> Option<i32> {
    match line {
        XL_LINE_CONTINUOUS => Some(match weight {
            XL_WEIGHT_HAIRLINE => 7,
            XL_WEIGHT_MEDIUM => 2,
            XL_WEIGHT_THICK => 5,
            _ => 1,
        }),
        XL_LINE_DASH => Some(if weight == XL_WEIGHT_MEDIUM { 8 } else { 3 }),
        XL_LINE_DASH_DOT => Some(if weight == XL_WEIGHT_MEDIUM { 10 } else { 9 }),
        XL_LINE_DASH_DOT_DOT => Some(if weight == XL_WEIGHT_MEDIUM { 12 } else { 11 }),
        XL_LINE_DOT => Some(4),
        XL_LINE_DOUBLE => Some(6),
        XL_LINE_SLANT_DASH_DOT => Some(13),
        _ => None,
    }
}

/// Decode one VARIANT into the wire cell value.
fn variant_to_cell_value(variant: &VARIANT) -> CellValue {
    if variant_is_empty(variant) {
        CellValue::Null
    } else if let Some(b) = variant_get_bool(variant) {
        CellValue::Bool(b)
    } else if let Some(n) = variant_get_f64(variant) {
        CellValue::Number(n)
    } else if let Some(s) = variant_get_string(variant) {
        CellValue::String(s)
    } else if let Some(scode) = variant_get_error_code(variant) {
        CellValue::Error(CellError {
            code: cell_error_name(scode),
        })
    } else {
        CellValue::Null
    }
}

/// Error cells arrive as VT_ERROR with scode `0x800A0000 | xlErr`.
fn cell_error_name(scode: i32) -> String {
    match (scode as u32) & 0xFFFF {
        2000 => "#NULL!".to_string(),
        2007 => "#DIV/0!".to_string(),
        2015 => "#VALUE!".to_string(),
        2023 => "#REF!".to_string(),
        2029 => "#NAME?".to_string(),
        2036 => "#NUM!".to_string(),
        2042 => "#N/A".to_string(),
        other => format!("#ERR{other}"),
    }
}

fn prop_string(obj: &DispatchObject, name: &str) -> Option<String> {
    obj.get_property(name)
        .ok()
        .and_then(|v| variant_get_string(&v))
}

fn prop_f64(obj: &DispatchObject, name: &str) -> Option<f64> {
    obj.get_property(name).ok().and_then(|v| variant_get_f64(&v))
}

fn prop_bool(obj: &DispatchObject, name: &str) -> Option<bool> {
    obj.get_property(name)
        .ok()
        .and_then(|v| variant_get_bool(&v))
}

fn prop_i32(obj: &DispatchObject, name: &str) -> Option<i32> {
    prop_f64(obj, name).map(|n| n as i32)
}

fn prop_i64(obj: &DispatchObject, name: &str) -> Option<i64> {
    prop_f64(obj, name).map(|n| n as i64)
}

fn required_string(obj: &DispatchObject, name: &str) -> Result<String, String> {
    let v = obj.get_property(name)?;
    variant_get_string(&v).ok_or_else(|| format!("'{name}' did not return a string"))
}

fn required_f64(obj: &DispatchObject, name: &str) -> Result<f64, String> {
    let v = obj.get_property(name)?;
    variant_get_f64(&v).ok_or_else(|| format!("'{name}' did not return a number"))
}
