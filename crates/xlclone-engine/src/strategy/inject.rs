//! Template injection: a package skeleton filled with value-only XML.
//!
//! Duplicates an externally supplied, unpacked package skeleton, overwrites
//! its worksheet parts with XML synthesized from one bulk value read per
//! sheet, and rezips the tree. Fast because it never reads a single style
//! attribute, and lossy for the same reason: output cells carry values at
//! their original addresses and nothing else. Strings go inline, so the
//! shared-strings part is written well-formed but empty.

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use xlclone_container::{copy_tree, pack_tree, ScratchDir, CONTENT_TYPES_PART};
use xlclone_core::{column_to_letters, CellValue, DocumentHost, DocumentId, UsedRegion, ValueGrid};

use crate::controller::StrategyOutcome;
use crate::error::CloneError;
use crate::options::CloneOptions;
use crate::snapshot::{self, WorkbookSnapshot};
use crate::strategy::host_failure;

const EMPTY_SHARED_STRINGS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" count=\"0\" uniqueCount=\"0\"/>\n";

pub fn run(
    host: &dyn DocumentHost,
    doc: DocumentId,
    output: &Path,
    options: &CloneOptions,
) -> Result<StrategyOutcome, CloneError> {
    let Some(template) = options.template_dir.as_deref() else {
        return Ok(StrategyOutcome::Unavailable(
            "no template configured".to_string(),
        ));
    };
    if !template.is_dir() {
        return Ok(StrategyOutcome::Unavailable(format!(
            "template {} is not a directory",
            template.display()
        )));
    }
    if !template.join(CONTENT_TYPES_PART).exists() {
        return Ok(StrategyOutcome::Unavailable(format!(
            "template {} has no {CONTENT_TYPES_PART}",
            template.display()
        )));
    }

    let snapshot = match snapshot::snapshot_values(host, doc) {
        Ok(snapshot) => snapshot,
        Err(e) => return host_failure("value snapshot", e),
    };

    // The work tree is acquired fresh and removed again on every exit path
    // below, success or not.
    let work = ScratchDir::fresh(options.work_dir())?;
    copy_tree(template, work.path())?;
    debug!(
        template = %template.display(),
        work = %work.path().display(),
        "duplicated template"
    );

    inject_into_tree(&snapshot, work.path())?;
    pack_tree(output, work.path())?;

    info!(
        sheets = snapshot.sheets.len(),
        output = %output.display(),
        "injected values into template"
    );
    Ok(StrategyOutcome::Succeeded)
}

/// Overwrite the tree's worksheet parts with synthesized value-only XML and
/// give it an empty shared-strings part. Template boilerplate outside
/// `xl/worksheets/` and `xl/sharedStrings.xml` passes through untouched.
fn inject_into_tree(snapshot: &WorkbookSnapshot, root: &Path) -> Result<(), CloneError> {
    let worksheets = root.join("xl").join("worksheets");
    fs::create_dir_all(&worksheets)?;

    for (position, sheet) in snapshot.sheets.iter().enumerate() {
        let Some(region) = sheet.region else {
            debug!(sheet = %sheet.name, "empty sheet, template part kept as is");
            continue;
        };

        // Worksheet parts are addressed by position, not name; the
        // template's workbook part already binds sheetN.xml to the Nth tab.
        let part = worksheets.join(format!("sheet{}.xml", position + 1));
        fs::write(&part, worksheet_xml(region, &sheet.values))?;
        debug!(sheet = %sheet.name, region = %region, part = %part.display(), "wrote worksheet part");
    }

    fs::write(root.join("xl").join("sharedStrings.xml"), EMPTY_SHARED_STRINGS)?;
    Ok(())
}

/// Synthesize one worksheet part: one `<row>` per grid row at its original
/// 1-based index, one `<c>` per cell at its original column letters.
///
/// Blank cells stay present as empty `<c>` elements; text goes inline;
/// booleans encode as `0`/`1`; numbers (date serials included) print as
/// plain numeric text.
fn worksheet_xml(region: UsedRegion, values: &ValueGrid) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData>"#,
    );

    for (i, row_values) in values.iter().enumerate() {
        let row = region.first_row + i as u32;
        content.push_str(&format!("\n        <row r=\"{row}\">"));

        for (j, value) in row_values.iter().enumerate() {
            let cell_ref = format!("{}{row}", column_to_letters(region.first_col + j as u32));
            match value {
                CellValue::Blank => {
                    content.push_str(&format!("\n            <c r=\"{cell_ref}\"/>"));
                }
                CellValue::Bool(b) => {
                    content.push_str(&format!(
                        "\n            <c r=\"{cell_ref}\" t=\"b\"><v>{}</v></c>",
                        i32::from(*b)
                    ));
                }
                CellValue::Number(n) => {
                    content.push_str(&format!(
                        "\n            <c r=\"{cell_ref}\"><v>{n}</v></c>"
                    ));
                }
                CellValue::Text(s) => {
                    content.push_str(&format!(
                        "\n            <c r=\"{cell_ref}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                        escape_xml(s)
                    ));
                }
            }
        }

        content.push_str("\n        </row>");
    }

    content.push_str("\n    </sheetData>\n</worksheet>\n");
    content
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
