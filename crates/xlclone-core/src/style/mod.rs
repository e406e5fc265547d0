//! The cell formatting subset carried by a clone

mod alignment;
mod border;
mod color;
mod font;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, CellBorders};
pub use color::Rgb;
pub use font::{FontStyle, Underline};

/// Everything the pipeline preserves about one cell's appearance.
///
/// Each facet is independently optional. Attribute reads against the host
/// are degradable, so a facet that could not be read is simply absent and
/// the rest of the style still applies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellStyle {
    /// Font attributes, absent when the cell uses the default font.
    pub font: Option<FontStyle>,
    /// Background fill, absent when the cell has no pattern.
    pub fill: Option<Fill>,
    /// Alignment, absent when every alignment attribute is the default.
    pub alignment: Option<Alignment>,
    /// Number format string, absent for the "General" default.
    pub number_format: Option<String>,
    /// Borders, absent when no edge has a line.
    pub borders: Option<CellBorders>,
}

impl CellStyle {
    /// True when no facet carries anything to apply.
    pub fn is_empty(&self) -> bool {
        self.font.is_none()
            && self.fill.is_none()
            && self.alignment.is_none()
            && self.number_format.is_none()
            && self.borders.is_none()
    }
}

/// A cell background fill.
///
/// Pattern kinds are not distinguished: the host either reports "no pattern"
/// (no fill at all) or some pattern, which becomes a solid fill of the
/// interior color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// The fill color.
    pub color: Rgb,
}
