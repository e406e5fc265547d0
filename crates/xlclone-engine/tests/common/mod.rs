//! Scripted in-memory host shared by the engine integration tests.
//!
//! `FakeHost` implements the full document-host port over fixture data,
//! with per-call failure injection (a refusing native save, an unreadable
//! workbook, a poisoned font read) and call recording for the lifecycle
//! assertions. Not every test binary uses every helper.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use xlclone_core::{
    CellValue, DocumentHost, DocumentId, DocumentInfo, HostError, RangeData, RawAlignment,
    RawBorders, RawFont, RawInterior, UsedRegion, ValueGrid,
};

/// What the fake does when asked for a native copy.
pub enum SaveCopy {
    /// Write a real zip package holding these parts.
    Package(Vec<(String, Vec<u8>)>),
    /// Write bytes that are not a zip, like an encrypted CFB envelope.
    Garbage,
    /// Refuse with a recoverable error.
    Refuse,
    /// Die with a fatal transport error.
    Fatal,
}

/// One scripted open document.
pub struct FakeDoc {
    pub name: String,
    pub sheets: Vec<FakeSheet>,
    pub save_copy: SaveCopy,
    /// When set, every state read fails with a recoverable error.
    pub unreadable: bool,
}

impl FakeDoc {
    pub fn named(name: &str) -> Self {
        FakeDoc {
            name: name.to_string(),
            sheets: Vec::new(),
            save_copy: SaveCopy::Refuse,
            unreadable: false,
        }
    }

    pub fn sheet(mut self, sheet: FakeSheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn save_copy(mut self, behavior: SaveCopy) -> Self {
        self.save_copy = behavior;
        self
    }

    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }
}

/// One scripted sheet. Attribute maps are keyed by 1-based `(row, col)`.
#[derive(Default)]
pub struct FakeSheet {
    pub name: String,
    pub region: Option<UsedRegion>,
    pub values: ValueGrid,
    pub fonts: HashMap<(u32, u32), RawFont>,
    pub interiors: HashMap<(u32, u32), RawInterior>,
    pub alignments: HashMap<(u32, u32), RawAlignment>,
    pub number_formats: HashMap<(u32, u32), String>,
    pub borders: HashMap<(u32, u32), RawBorders>,
    /// Merge-area address reported for each covered cell.
    pub merges: HashMap<(u32, u32), String>,
    pub column_widths: HashMap<u32, f64>,
    pub row_heights: HashMap<u32, f64>,
    /// Cells whose font read fails with a recoverable error.
    pub fail_fonts: HashSet<(u32, u32)>,
}

impl FakeSheet {
    /// A sheet whose used region starts at 1-based `(first_row, first_col)`
    /// and covers exactly `values`.
    pub fn grid(name: &str, first_row: u32, first_col: u32, values: ValueGrid) -> Self {
        let region = values.first().map(|first| {
            UsedRegion::new(
                first_row,
                first_col,
                values.len() as u32,
                first.len() as u32,
            )
        });
        FakeSheet {
            name: name.to_string(),
            region,
            values,
            ..Default::default()
        }
    }

    pub fn empty(name: &str) -> Self {
        FakeSheet {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Scripted host: fixed documents, recorded lifecycle calls.
pub struct FakeHost {
    docs: Vec<FakeDoc>,
    opened: RefCell<Vec<PathBuf>>,
    closed: RefCell<Vec<DocumentId>>,
    copies: RefCell<Vec<PathBuf>>,
}

impl FakeHost {
    pub fn with_docs(docs: Vec<FakeDoc>) -> Self {
        FakeHost {
            docs,
            opened: RefCell::new(Vec::new()),
            closed: RefCell::new(Vec::new()),
            copies: RefCell::new(Vec::new()),
        }
    }

    pub fn single(doc: FakeDoc) -> Self {
        FakeHost::with_docs(vec![doc])
    }

    /// Handle of the first scripted document.
    pub fn first_id(&self) -> DocumentId {
        DocumentId(1)
    }

    /// Documents closed so far, in call order.
    pub fn closed(&self) -> Vec<DocumentId> {
        self.closed.borrow().clone()
    }

    /// Paths opened read-only so far, in call order.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.borrow().clone()
    }

    /// Native-copy destinations requested so far.
    pub fn copies(&self) -> Vec<PathBuf> {
        self.copies.borrow().clone()
    }

    fn doc(&self, id: DocumentId) -> Result<&FakeDoc, HostError> {
        id.0.checked_sub(1)
            .and_then(|index| self.docs.get(index as usize))
            .ok_or_else(|| HostError::Operation(format!("unknown document {}", id.0)))
    }

    fn sheet(&self, id: DocumentId, sheet: u32) -> Result<&FakeSheet, HostError> {
        self.doc(id)?
            .sheets
            .get(sheet as usize)
            .ok_or_else(|| HostError::Operation(format!("no sheet {sheet}")))
    }

    fn state_guard(&self, id: DocumentId) -> Result<(), HostError> {
        if self.doc(id)?.unreadable {
            Err(HostError::Operation("workbook state unreadable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DocumentHost for FakeHost {
    fn list_documents(&self) -> Result<Vec<DocumentInfo>, HostError> {
        Ok(self
            .docs
            .iter()
            .enumerate()
            .map(|(i, doc)| DocumentInfo {
                id: DocumentId(i as u64 + 1),
                name: doc.name.clone(),
                active: i == 0,
            })
            .collect())
    }

    fn open_readonly(&self, path: &Path) -> Result<DocumentId, HostError> {
        self.opened.borrow_mut().push(path.to_path_buf());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.docs
            .iter()
            .position(|doc| doc.name == name)
            .map(|i| DocumentId(i as u64 + 1))
            .ok_or_else(|| HostError::Operation(format!("cannot open '{name}'")))
    }

    fn close_without_saving(&self, doc: DocumentId) -> Result<(), HostError> {
        self.doc(doc)?;
        self.closed.borrow_mut().push(doc);
        Ok(())
    }

    fn save_copy(&self, doc: DocumentId, dest: &Path) -> Result<(), HostError> {
        self.copies.borrow_mut().push(dest.to_path_buf());
        match &self.doc(doc)?.save_copy {
            SaveCopy::Package(parts) => xlclone_container::pack_parts(dest, parts)
                .map_err(|e| HostError::Operation(e.to_string())),
            SaveCopy::Garbage => fs::write(dest, b"\x00not a zip package at all")
                .map_err(|e| HostError::Operation(e.to_string())),
            SaveCopy::Refuse => Err(HostError::Operation(
                "the host refused to save a copy".to_string(),
            )),
            SaveCopy::Fatal => Err(HostError::Unavailable("bridge process died".to_string())),
        }
    }

    fn sheet_names(&self, doc: DocumentId) -> Result<Vec<String>, HostError> {
        self.state_guard(doc)?;
        Ok(self
            .doc(doc)?
            .sheets
            .iter()
            .map(|sheet| sheet.name.clone())
            .collect())
    }

    fn used_region(&self, doc: DocumentId, sheet: u32) -> Result<Option<UsedRegion>, HostError> {
        self.state_guard(doc)?;
        Ok(self.sheet(doc, sheet)?.region)
    }

    fn region_values(&self, doc: DocumentId, sheet: u32) -> Result<RangeData, HostError> {
        self.state_guard(doc)?;
        let values = &self.sheet(doc, sheet)?.values;
        Ok(range_data(values))
    }

    fn cell_font(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawFont, HostError> {
        let sheet = self.sheet(doc, sheet)?;
        if sheet.fail_fonts.contains(&(row, col)) {
            return Err(HostError::Operation(format!(
                "font read failed at ({row},{col})"
            )));
        }
        Ok(sheet.fonts.get(&(row, col)).cloned().unwrap_or_default())
    }

    fn cell_interior(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawInterior, HostError> {
        Ok(self
            .sheet(doc, sheet)?
            .interiors
            .get(&(row, col))
            .copied()
            .unwrap_or_default())
    }

    fn cell_alignment(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawAlignment, HostError> {
        Ok(self
            .sheet(doc, sheet)?
            .alignments
            .get(&(row, col))
            .copied()
            .unwrap_or_default())
    }

    fn cell_number_format(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<Option<String>, HostError> {
        Ok(self.sheet(doc, sheet)?.number_formats.get(&(row, col)).cloned())
    }

    fn cell_borders(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<RawBorders, HostError> {
        Ok(self
            .sheet(doc, sheet)?
            .borders
            .get(&(row, col))
            .copied()
            .unwrap_or_default())
    }

    fn merge_area(
        &self,
        doc: DocumentId,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> Result<Option<String>, HostError> {
        Ok(self.sheet(doc, sheet)?.merges.get(&(row, col)).cloned())
    }

    fn column_width(&self, doc: DocumentId, sheet: u32, col: u32) -> Result<Option<f64>, HostError> {
        Ok(self.sheet(doc, sheet)?.column_widths.get(&col).copied())
    }

    fn row_height(&self, doc: DocumentId, sheet: u32, row: u32) -> Result<Option<f64>, HostError> {
        Ok(self.sheet(doc, sheet)?.row_heights.get(&row).copied())
    }
}

/// Reproduce the host's shape rules: lone cell as a scalar, one row or one
/// column as a flat list, anything larger as a grid.
fn range_data(values: &ValueGrid) -> RangeData {
    if values.len() == 1 && values[0].len() == 1 {
        RangeData::Scalar(values[0][0].clone())
    } else if values.len() == 1 {
        RangeData::Row(values[0].clone())
    } else if values.iter().all(|row| row.len() == 1) {
        RangeData::Column(values.iter().map(|row| row[0].clone()).collect())
    } else {
        RangeData::Grid(values.clone())
    }
}

/// The 3x2 fixture grid used across strategy tests.
pub fn name_age_grid() -> ValueGrid {
    vec![
        vec![CellValue::from("Name"), CellValue::from("Age")],
        vec![CellValue::from("Ana"), CellValue::from(30)],
        vec![CellValue::from("Leo"), CellValue::from(25)],
    ]
}

/// Parts of a small but plausible workbook package, for native-copy
/// fixtures.
pub fn sample_parts() -> Vec<(String, Vec<u8>)> {
    vec![
        (
            "[Content_Types].xml".to_string(),
            b"<Types><Default Extension=\"xml\" ContentType=\"application/xml\"/></Types>".to_vec(),
        ),
        ("_rels/.rels".to_string(), b"<Relationships/>".to_vec()),
        (
            "xl/workbook.xml".to_string(),
            b"<workbook><sheets><sheet name=\"People\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>".to_vec(),
        ),
        (
            "xl/worksheets/sheet1.xml".to_string(),
            b"<worksheet><sheetData/></worksheet>".to_vec(),
        ),
    ]
}

/// Lay a one-sheet template skeleton down at `root`, the unpacked-package
/// shape the injection strategy duplicates.
pub fn write_template(root: &Path) {
    fs::create_dir_all(root.join("_rels")).unwrap();
    fs::create_dir_all(root.join("xl").join("_rels")).unwrap();
    fs::create_dir_all(root.join("xl").join("worksheets")).unwrap();

    fs::write(
        root.join("[Content_Types].xml"),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
    <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
</Types>
"#,
    )
    .unwrap();

    fs::write(
        root.join("_rels/.rels"),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>
"#,
    )
    .unwrap();

    fs::write(
        root.join("xl/workbook.xml"),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
        <sheet name="Sheet1" sheetId="1" r:id="rId1"/>
    </sheets>
</workbook>
"#,
    )
    .unwrap();

    fs::write(
        root.join("xl/_rels/workbook.xml.rels"),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>
"#,
    )
    .unwrap();

    fs::write(
        root.join("xl/worksheets/sheet1.xml"),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData/>
</worksheet>
"#,
    )
    .unwrap();
}
