//! Full reconstruction through the authoring layer.
//!
//! Reads everything the port exposes - values in one bulk pass per sheet,
//! then styles cell by cell - and writes a brand-new workbook with
//! `rust_xlsxwriter`. The most expensive strategy by far (several remote
//! calls per cell) and the only one with no preconditions, so it terminates
//! the fallback chain. Formulas, charts, and anything else outside the
//! snapshot do not survive; values, translated styles, merges, and explicit
//! dimensions do.

use std::path::Path;

use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatUnderline, Workbook, Worksheet, XlsxError,
};
use tracing::{debug, info};
use xlclone_container::ContainerError;
use xlclone_core::{
    Alignment, BorderLineStyle, CellStyle, CellValue, DocumentHost, DocumentId,
    HorizontalAlignment, Underline, VerticalAlignment,
};

use crate::controller::StrategyOutcome;
use crate::error::CloneError;
use crate::snapshot::{self, SheetSnapshot};
use crate::strategy::host_failure;

pub fn run(
    host: &dyn DocumentHost,
    doc: DocumentId,
    output: &Path,
) -> Result<StrategyOutcome, CloneError> {
    let snapshot = match snapshot::snapshot_with_styles(host, doc) {
        Ok(snapshot) => snapshot,
        Err(e) => return host_failure("styled snapshot", e),
    };

    let mut workbook = Workbook::new();
    for sheet in &snapshot.sheets {
        let worksheet = workbook.add_worksheet();
        build_sheet(worksheet, sheet).map_err(|e| authoring_error(output, e))?;
    }
    workbook
        .save(output)
        .map_err(|e| authoring_error(output, e))?;

    info!(
        sheets = snapshot.sheets.len(),
        output = %output.display(),
        "rebuilt workbook"
    );
    Ok(StrategyOutcome::Succeeded)
}

/// Reproduce one source sheet. Sheet names are copied verbatim; an empty
/// sheet contributes its tab and nothing else, keeping sheet count and
/// order intact.
fn build_sheet(worksheet: &mut Worksheet, sheet: &SheetSnapshot) -> Result<(), XlsxError> {
    worksheet.set_name(&sheet.name)?;
    let Some(region) = sheet.region else {
        return Ok(());
    };

    // Merges go in first: merging blanks the covered cells, so the
    // top-left content written afterwards survives.
    for merge in &sheet.merges {
        if merge.is_single_cell() {
            continue;
        }
        worksheet.merge_range(
            merge.first_row - 1,
            (merge.first_col - 1) as u16,
            merge.last_row - 1,
            (merge.last_col - 1) as u16,
            "",
            &Format::new(),
        )?;
    }

    for (i, row_values) in sheet.values.iter().enumerate() {
        let row = region.first_row - 1 + i as u32;
        for (j, value) in row_values.iter().enumerate() {
            let col = (region.first_col as usize - 1 + j) as u16;
            let style = sheet.styles.get(i).and_then(|styles| styles.get(j));
            write_cell(worksheet, row, col, value, style)?;
        }
    }

    for &(col, width) in &sheet.column_widths {
        if width > 0.0 {
            worksheet.set_column_width((col - 1) as u16, width)?;
        }
    }
    for &(row, height) in &sheet.row_heights {
        if height > 0.0 {
            worksheet.set_row_height(row - 1, height)?;
        }
    }

    debug!(
        sheet = %sheet.name,
        region = %region,
        merges = sheet.merges.len(),
        "rebuilt sheet"
    );
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    style: Option<&CellStyle>,
) -> Result<(), XlsxError> {
    let format = style.filter(|style| !style.is_empty()).map(style_format);

    match (value, format) {
        // A blank cell with no style contributes nothing to the output.
        (CellValue::Blank, None) => {}
        (CellValue::Blank, Some(format)) => {
            worksheet.write_blank(row, col, &format)?;
        }
        (CellValue::Bool(b), None) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        (CellValue::Bool(b), Some(format)) => {
            worksheet.write_boolean_with_format(row, col, *b, &format)?;
        }
        (CellValue::Number(n), None) => {
            worksheet.write_number(row, col, *n)?;
        }
        (CellValue::Number(n), Some(format)) => {
            worksheet.write_number_with_format(row, col, *n, &format)?;
        }
        (CellValue::Text(s), None) => {
            worksheet.write_string(row, col, s)?;
        }
        (CellValue::Text(s), Some(format)) => {
            worksheet.write_string_with_format(row, col, s, &format)?;
        }
    }
    Ok(())
}

/// Build an output format from one translated style. Facets apply
/// independently; an absent facet leaves its part of the format at the
/// default.
fn style_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if let Some(font) = &style.font {
        if let Some(name) = &font.name {
            format = format.set_font_name(name);
        }
        if let Some(size) = font.size {
            format = format.set_font_size(size);
        }
        if font.bold {
            format = format.set_bold();
        }
        if font.italic {
            format = format.set_italic();
        }
        if font.strikethrough {
            format = format.set_font_strikethrough();
        }
        format = match font.underline {
            Underline::None => format,
            Underline::Single => format.set_underline(FormatUnderline::Single),
            Underline::Double => format.set_underline(FormatUnderline::Double),
        };
        if let Some(color) = font.color {
            format = format.set_font_color(Color::RGB(color.as_u32()));
        }
    }

    if let Some(fill) = &style.fill {
        format = format.set_background_color(Color::RGB(fill.color.as_u32()));
    }

    if let Some(alignment) = &style.alignment {
        format = apply_alignment(format, alignment);
    }

    if let Some(number_format) = &style.number_format {
        format = format.set_num_format(number_format);
    }

    if let Some(borders) = &style.borders {
        if let Some(edge) = borders.top {
            format = format.set_border_top(border_style(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_top_color(Color::RGB(color.as_u32()));
            }
        }
        if let Some(edge) = borders.bottom {
            format = format.set_border_bottom(border_style(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_bottom_color(Color::RGB(color.as_u32()));
            }
        }
        if let Some(edge) = borders.left {
            format = format.set_border_left(border_style(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_left_color(Color::RGB(color.as_u32()));
            }
        }
        if let Some(edge) = borders.right {
            format = format.set_border_right(border_style(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_right_color(Color::RGB(color.as_u32()));
            }
        }
    }

    format
}

fn apply_alignment(mut format: Format, alignment: &Alignment) -> Format {
    format = match alignment.horizontal {
        HorizontalAlignment::General => format,
        HorizontalAlignment::Left => format.set_align(FormatAlign::Left),
        HorizontalAlignment::Center => format.set_align(FormatAlign::Center),
        HorizontalAlignment::Right => format.set_align(FormatAlign::Right),
        HorizontalAlignment::Fill => format.set_align(FormatAlign::Fill),
        HorizontalAlignment::Justify => format.set_align(FormatAlign::Justify),
        HorizontalAlignment::Distributed => format.set_align(FormatAlign::Distributed),
    };
    format = match alignment.vertical {
        VerticalAlignment::Bottom => format,
        VerticalAlignment::Top => format.set_align(FormatAlign::Top),
        VerticalAlignment::Center => format.set_align(FormatAlign::VerticalCenter),
        VerticalAlignment::Justify => format.set_align(FormatAlign::VerticalJustify),
        VerticalAlignment::Distributed => format.set_align(FormatAlign::VerticalDistributed),
    };
    if alignment.wrap_text {
        format = format.set_text_wrap();
    }
    if alignment.rotation != 0 {
        format = format.set_rotation(alignment.rotation);
    }
    if alignment.indent > 0 {
        format = format.set_indent(alignment.indent);
    }
    format
}

fn border_style(line: BorderLineStyle) -> FormatBorder {
    match line {
        BorderLineStyle::Thin => FormatBorder::Thin,
        BorderLineStyle::Medium => FormatBorder::Medium,
        BorderLineStyle::Dashed => FormatBorder::Dashed,
        BorderLineStyle::Dotted => FormatBorder::Dotted,
        BorderLineStyle::Thick => FormatBorder::Thick,
        BorderLineStyle::Double => FormatBorder::Double,
        BorderLineStyle::Hair => FormatBorder::Hair,
        BorderLineStyle::MediumDashed => FormatBorder::MediumDashed,
        BorderLineStyle::DashDot => FormatBorder::DashDot,
        BorderLineStyle::MediumDashDot => FormatBorder::MediumDashDot,
        BorderLineStyle::DashDotDot => FormatBorder::DashDotDot,
        BorderLineStyle::MediumDashDotDot => FormatBorder::MediumDashDotDot,
        BorderLineStyle::SlantDashDot => FormatBorder::SlantDashDot,
    }
}

/// Authoring failures land in the same class as any other unwritable
/// output package.
fn authoring_error(output: &Path, error: XlsxError) -> CloneError {
    CloneError::Container(ContainerError::PackWrite {
        path: output.to_path_buf(),
        reason: error.to_string(),
    })
}
