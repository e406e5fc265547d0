//! Snapshot cell values

/// A value read from one cell of the host document.
///
/// Dates are not a distinct kind: the host hands them over in its native
/// serial-number encoding and they stay numbers with an associated display
/// format all the way into the output package.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// The cell holds nothing.
    #[default]
    Blank,
    /// A boolean.
    Bool(bool),
    /// A number, date serials included.
    Number(f64),
    /// A text value.
    Text(String),
}

/// A row-major grid of snapshot values.
pub type ValueGrid = Vec<Vec<CellValue>>;

impl CellValue {
    /// True when the cell holds no value.
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }
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

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}
