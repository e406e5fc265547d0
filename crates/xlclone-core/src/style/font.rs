//! Font attributes

use super::color::Rgb;

/// Font attributes captured for one cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontStyle {
    /// Font family name, absent for the document default.
    pub name: Option<String>,
    /// Size in points, absent for the document default.
    pub size: Option<f64>,
    /// Bold flag.
    pub bold: bool,
    /// Italic flag.
    pub italic: bool,
    /// Strikethrough flag.
    pub strikethrough: bool,
    /// Underline kind.
    pub underline: Underline,
    /// Font color, absent for automatic.
    pub color: Option<Rgb>,
}

impl FontStyle {
    /// True when nothing was captured beyond the defaults.
    pub fn is_default(&self) -> bool {
        *self == FontStyle::default()
    }
}

/// The underline kinds the output schema distinguishes.
///
/// The host knows more (accounting underlines); those collapse to
/// [`Underline::None`] during translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Underline {
    /// No underline.
    #[default]
    None,
    /// Single underline.
    Single,
    /// Double underline.
    Double,
}
