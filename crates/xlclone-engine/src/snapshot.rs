//! Reads workbook state out of the host into plain values.
//!
//! Two passes with very different costs: the value pass is one bulk read per
//! sheet, the style pass is several automation calls per cell and is only
//! done for the rebuild strategy. Style-pass reads are individually guarded;
//! one unreadable attribute of one cell degrades to "attribute absent" and
//! the run continues. Only fatal host errors abort.

use ahash::AHashSet;
use tracing::{debug, info};
use xlclone_core::{
    translate, CellRange, CellStyle, CellValue, DocumentHost, DocumentId, HostError, UsedRegion,
    ValueGrid,
};

/// Everything read from one sheet.
#[derive(Debug, Default)]
pub struct SheetSnapshot {
    pub name: String,
    /// `None` when the sheet has no populated cell; such sheets are carried
    /// through (so sheet count and order survive) but get no cell content.
    pub region: Option<UsedRegion>,
    /// Row-major values, indexed relative to the region origin.
    pub values: ValueGrid,
    /// Per-cell styles aligned with `values`. Empty until a style pass runs.
    pub styles: Vec<Vec<CellStyle>>,
    /// Distinct merge regions in first-seen order.
    pub merges: Vec<CellRange>,
    /// Explicit column widths by 1-based column index.
    pub column_widths: Vec<(u32, f64)>,
    /// Explicit row heights by 1-based row index.
    pub row_heights: Vec<(u32, f64)>,
}

impl SheetSnapshot {
    /// True when the sheet has nothing to clone.
    pub fn is_empty(&self) -> bool {
        self.region.is_none()
    }
}

/// One whole workbook, sheets in workbook order.
#[derive(Debug, Default)]
pub struct WorkbookSnapshot {
    pub sheets: Vec<SheetSnapshot>,
}

/// Read sheet names, used regions, and values. One bulk read per sheet;
/// per-cell value reads would take minutes on sheets with thousands of rows.
pub fn snapshot_values(
    host: &dyn DocumentHost,
    doc: DocumentId,
) -> Result<WorkbookSnapshot, HostError> {
    let names = host.sheet_names(doc)?;
    let mut sheets = Vec::with_capacity(names.len());

    for (idx, name) in names.into_iter().enumerate() {
        let idx = idx as u32;
        let mut sheet = SheetSnapshot {
            name,
            region: host.used_region(doc, idx)?,
            ..Default::default()
        };

        if let Some(region) = sheet.region {
            let grid = host.region_values(doc, idx)?.into_grid();
            if is_single_blank(region, &grid) {
                // A sheet with no content still reports a 1x1 used range
                // holding a blank; normalize that to "nothing to clone".
                sheet.region = None;
                debug!(sheet = %sheet.name, "sheet is empty, skipping");
            } else {
                info!(
                    sheet = %sheet.name,
                    region = %region,
                    cells = region.cell_count(),
                    "read sheet values"
                );
                sheet.values = grid;
            }
        } else {
            debug!(sheet = %sheet.name, "sheet has no used region, skipping");
        }

        sheets.push(sheet);
    }

    Ok(WorkbookSnapshot { sheets })
}

/// [`snapshot_values`] plus the per-cell style pass: translated styles,
/// merge regions, and explicit column/row dimensions.
pub fn snapshot_with_styles(
    host: &dyn DocumentHost,
    doc: DocumentId,
) -> Result<WorkbookSnapshot, HostError> {
    let mut snapshot = snapshot_values(host, doc)?;
    for (idx, sheet) in snapshot.sheets.iter_mut().enumerate() {
        read_sheet_styles(host, doc, idx as u32, sheet)?;
    }
    Ok(snapshot)
}

fn is_single_blank(region: UsedRegion, grid: &ValueGrid) -> bool {
    region.cell_count() == 1
        && grid
            .first()
            .and_then(|row| row.first())
            .map_or(true, CellValue::is_blank)
}

fn read_sheet_styles(
    host: &dyn DocumentHost,
    doc: DocumentId,
    sheet_idx: u32,
    sheet: &mut SheetSnapshot,
) -> Result<(), HostError> {
    let Some(region) = sheet.region else {
        return Ok(());
    };

    let mut styles = Vec::with_capacity(region.rows as usize);
    let mut merges = Vec::new();
    let mut seen_merges = AHashSet::new();

    for r in 0..region.rows {
        let row = region.first_row + r;
        let mut style_row = Vec::with_capacity(region.cols as usize);

        for c in 0..region.cols {
            let col = region.first_col + c;
            style_row.push(read_cell_style(host, doc, sheet_idx, row, col)?);

            // A merge spans many cells but is recorded once per distinct
            // address, keyed on the host's own address string.
            let area = guarded(host.merge_area(doc, sheet_idx, row, col), "merge", row, col)?;
            if let Some(address) = area.flatten() {
                if seen_merges.insert(address.clone()) {
                    match address.parse::<CellRange>() {
                        Ok(range) => merges.push(range),
                        Err(e) => {
                            debug!(%address, error = %e, "unparseable merge address ignored")
                        }
                    }
                }
            }
        }
        styles.push(style_row);

        if region.rows > 100 && (r + 1) % 500 == 0 {
            info!(
                sheet = %sheet.name,
                rows_done = r + 1,
                rows_total = region.rows,
                "style pass progress"
            );
        }
    }

    let mut column_widths = Vec::new();
    for c in 0..region.cols {
        let col = region.first_col + c;
        let width = guarded(host.column_width(doc, sheet_idx, col), "width", 0, col)?;
        if let Some(w) = width.flatten() {
            column_widths.push((col, w));
        }
    }

    let mut row_heights = Vec::new();
    for r in 0..region.rows {
        let row = region.first_row + r;
        let height = guarded(host.row_height(doc, sheet_idx, row), "height", row, 0)?;
        if let Some(h) = height.flatten() {
            row_heights.push((row, h));
        }
    }

    debug!(
        sheet = %sheet.name,
        merges = merges.len(),
        widths = column_widths.len(),
        heights = row_heights.len(),
        "style pass done"
    );

    sheet.styles = styles;
    sheet.merges = merges;
    sheet.column_widths = column_widths;
    sheet.row_heights = row_heights;
    Ok(())
}

/// Read and translate every style facet of one cell, each facet guarded on
/// its own: a failed font read leaves fill, alignment, number format, and
/// borders intact.
fn read_cell_style(
    host: &dyn DocumentHost,
    doc: DocumentId,
    sheet: u32,
    row: u32,
    col: u32,
) -> Result<CellStyle, HostError> {
    let font = guarded(host.cell_font(doc, sheet, row, col), "font", row, col)?
        .and_then(|raw| translate::translate_font(&raw));
    let fill = guarded(host.cell_interior(doc, sheet, row, col), "fill", row, col)?
        .and_then(|raw| translate::translate_interior(&raw));
    let alignment = guarded(
        host.cell_alignment(doc, sheet, row, col),
        "alignment",
        row,
        col,
    )?
    .map(|raw| translate::translate_alignment(&raw))
    .filter(|alignment| !alignment.is_default());
    let number_format = guarded(
        host.cell_number_format(doc, sheet, row, col),
        "number format",
        row,
        col,
    )?
    .and_then(translate::translate_number_format);
    let borders = guarded(host.cell_borders(doc, sheet, row, col), "borders", row, col)?
        .and_then(|raw| translate::translate_borders(&raw));

    Ok(CellStyle {
        font,
        fill,
        alignment,
        number_format,
        borders,
    })
}

/// Collapse a recoverable host error to `None`; pass fatal ones through.
fn guarded<T>(
    result: Result<T, HostError>,
    what: &'static str,
    row: u32,
    col: u32,
) -> Result<Option<T>, HostError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            debug!(what, row, col, error = %e, "attribute read failed, leaving it unset");
            Ok(None)
        }
    }
}
