//! Used regions, merge ranges, and bulk-read shapes

use std::fmt;
use std::str::FromStr;

use crate::column::{column_to_letters, letters_to_column};
use crate::error::{Error, Result};
use crate::value::{CellValue, ValueGrid};
use crate::MAX_ROWS;

/// The minimal rectangle of populated cells on one sheet.
///
/// Coordinates are 1-based, exactly as the host reports them. A sheet with
/// no populated cells has no used region at all rather than a degenerate one,
/// so `rows` and `cols` are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsedRegion {
    /// First populated row (1-based).
    pub first_row: u32,
    /// First populated column (1-based).
    pub first_col: u32,
    /// Number of rows in the rectangle.
    pub rows: u32,
    /// Number of columns in the rectangle.
    pub cols: u32,
}

impl UsedRegion {
    /// Create a new used region anchored at `(first_row, first_col)`.
    pub fn new(first_row: u32, first_col: u32, rows: u32, cols: u32) -> Self {
        UsedRegion {
            first_row,
            first_col,
            rows,
            cols,
        }
    }

    /// Last row covered (1-based, inclusive).
    pub fn last_row(&self) -> u32 {
        self.first_row + self.rows - 1
    }

    /// Last column covered (1-based, inclusive).
    pub fn last_col(&self) -> u32 {
        self.first_col + self.cols - 1
    }

    /// Total number of cells covered.
    pub fn cell_count(&self) -> u64 {
        self.rows as u64 * self.cols as u64
    }
}

impl fmt::Display for UsedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_to_letters(self.first_col),
            self.first_row,
            column_to_letters(self.last_col()),
            self.last_row()
        )
    }
}

/// An inclusive rectangular cell range, 1-based on both axes.
///
/// Parses A1-style addresses and tolerates `$` anchors ("$A$1:$B$2"); the
/// host reports merge areas in that anchored form. Corners are normalized so
/// `first_*` is never past `last_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// First row (1-based).
    pub first_row: u32,
    /// First column (1-based).
    pub first_col: u32,
    /// Last row (1-based, inclusive).
    pub last_row: u32,
    /// Last column (1-based, inclusive).
    pub last_col: u32,
}

impl CellRange {
    /// Create a range from two corners, normalizing their order.
    pub fn new(first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> Self {
        CellRange {
            first_row: first_row.min(last_row),
            first_col: first_col.min(last_col),
            last_row: first_row.max(last_row),
            last_col: first_col.max(last_col),
        }
    }

    /// Parse an A1-style address, single-cell ("B4") or rectangular
    /// ("A1:C3"), with or without `$` anchors.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((start, end)) => {
                let (first_row, first_col) = parse_cell(start)?;
                let (last_row, last_col) = parse_cell(end)?;
                Ok(CellRange::new(first_row, first_col, last_row, last_col))
            }
            None => {
                let (row, col) = parse_cell(s)?;
                Ok(CellRange::new(row, col, row, col))
            }
        }
    }

    /// Number of rows spanned.
    pub fn row_count(&self) -> u32 {
        self.last_row - self.first_row + 1
    }

    /// Number of columns spanned.
    pub fn col_count(&self) -> u32 {
        self.last_col - self.first_col + 1
    }

    /// Total number of cells spanned.
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// True when the range covers exactly one cell.
    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }

    /// True when the 1-based `(row, col)` lies inside the range.
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.first_row
            && row <= self.last_row
            && col >= self.first_col
            && col <= self.last_col
    }
}

/// Parse one A1-style cell like "B4" or "$B$4" into 1-based `(row, col)`.
fn parse_cell(s: &str) -> Result<(u32, u32)> {
    let bytes = s.as_bytes();
    let mut pos = 0;

    if pos < bytes.len() && bytes[pos] == b'$' {
        pos += 1;
    }
    let letters_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
        pos += 1;
    }
    let letters = &s[letters_start..pos];

    if pos < bytes.len() && bytes[pos] == b'$' {
        pos += 1;
    }
    let digits = &s[pos..];

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAddress(s.to_string()));
    }

    let col = letters_to_column(letters)?;
    let row: u32 = digits
        .parse()
        .map_err(|_| Error::InvalidAddress(s.to_string()))?;
    if row == 0 {
        return Err(Error::InvalidAddress(s.to_string()));
    }
    if row > MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS));
    }

    Ok((row, col))
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}{}", column_to_letters(self.first_col), self.first_row)
        } else {
            write!(
                f,
                "{}{}:{}{}",
                column_to_letters(self.first_col),
                self.first_row,
                column_to_letters(self.last_col),
                self.last_row
            )
        }
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CellRange::parse(s)
    }
}

/// The host's bulk-read result, whose shape depends on the region read:
/// a lone cell comes back as a scalar, a one-row or one-column region as a
/// flat list, and anything larger as a grid of rows.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeData {
    /// A single cell.
    Scalar(CellValue),
    /// A single row, left to right.
    Row(Vec<CellValue>),
    /// A single column, top to bottom.
    Column(Vec<CellValue>),
    /// Two or more rows of two or more cells, row-major.
    Grid(ValueGrid),
}

impl RangeData {
    /// Normalize any shape into the uniform row-major grid all consumers
    /// work with.
    pub fn into_grid(self) -> ValueGrid {
        match self {
            RangeData::Scalar(v) => vec![vec![v]],
            RangeData::Row(cells) => vec![cells],
            RangeData::Column(cells) => cells.into_iter().map(|v| vec![v]).collect(),
            RangeData::Grid(rows) => rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_used_region_extent() {
        let region = UsedRegion::new(2, 3, 4, 5);
        assert_eq!(region.last_row(), 5);
        assert_eq!(region.last_col(), 7);
        assert_eq!(region.cell_count(), 20);
        assert_eq!(region.to_string(), "C2:G5");
    }

    #[test]
    fn test_parse_single_cell() {
        let range = CellRange::parse("B4").unwrap();
        assert_eq!(range, CellRange::new(4, 2, 4, 2));
        assert!(range.is_single_cell());
        assert_eq!(range.to_string(), "B4");
    }

    #[test]
    fn test_parse_range() {
        let range = CellRange::parse("A1:C3").unwrap();
        assert_eq!(range.first_row, 1);
        assert_eq!(range.first_col, 1);
        assert_eq!(range.last_row, 3);
        assert_eq!(range.last_col, 3);
        assert_eq!(range.row_count(), 3);
        assert_eq!(range.col_count(), 3);
        assert_eq!(range.cell_count(), 9);
    }

    #[test]
    fn test_parse_anchored() {
        // merge areas come back host-anchored
        let range = CellRange::parse("$B$2:$D$2").unwrap();
        assert_eq!(range, CellRange::parse("B2:D2").unwrap());
        assert_eq!(range.to_string(), "B2:D2");
    }

    #[test]
    fn test_parse_normalizes_corners() {
        let range = CellRange::parse("C3:A1").unwrap();
        assert_eq!(range, CellRange::parse("A1:C3").unwrap());
    }

    #[test]
    fn test_parse_errors() {
        assert!(CellRange::parse("").is_err());
        assert!(CellRange::parse("1A").is_err());
        assert!(CellRange::parse("A0").is_err());
        assert!(CellRange::parse("A").is_err());
        assert!(CellRange::parse("12").is_err());
        assert!(CellRange::parse("A1:").is_err());
        assert!(CellRange::parse("A1048577").is_err()); // one past the last row
    }

    #[test]
    fn test_from_str() {
        let range: CellRange = "AA10:AB11".parse().unwrap();
        assert_eq!(range.first_col, 27);
        assert_eq!(range.last_col, 28);
    }

    #[test]
    fn test_contains() {
        let range = CellRange::parse("B2:D4").unwrap();
        assert!(range.contains(2, 2));
        assert!(range.contains(4, 4));
        assert!(range.contains(3, 3));
        assert!(!range.contains(1, 2));
        assert!(!range.contains(2, 5));
    }

    #[test]
    fn test_into_grid_shapes() {
        let expected = vec![vec![CellValue::from(1), CellValue::from(2)]];

        assert_eq!(
            RangeData::Row(vec![CellValue::from(1), CellValue::from(2)]).into_grid(),
            expected
        );
        assert_eq!(
            RangeData::Scalar(CellValue::from("x")).into_grid(),
            vec![vec![CellValue::from("x")]]
        );
        assert_eq!(
            RangeData::Column(vec![CellValue::from(1), CellValue::from(2)]).into_grid(),
            vec![vec![CellValue::from(1)], vec![CellValue::from(2)]]
        );

        let grid = vec![
            vec![CellValue::from(1), CellValue::from(2)],
            vec![CellValue::from(3), CellValue::Blank],
        ];
        assert_eq!(RangeData::Grid(grid.clone()).into_grid(), grid);
    }
}
