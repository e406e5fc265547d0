//! Cell border attributes

use super::color::Rgb;

/// The border set for one cell, one optional edge per side.
///
/// Diagonal borders are not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellBorders {
    /// Left edge.
    pub left: Option<BorderEdge>,
    /// Right edge.
    pub right: Option<BorderEdge>,
    /// Top edge.
    pub top: Option<BorderEdge>,
    /// Bottom edge.
    pub bottom: Option<BorderEdge>,
}

impl CellBorders {
    /// True when no edge has a line.
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

/// One edge's border: a line style plus an optional color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderEdge {
    /// The line style.
    pub line: BorderLineStyle,
    /// The line color, absent for automatic.
    pub color: Option<Rgb>,
}

/// The thirteen line styles of the output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderLineStyle {
    /// Thin continuous line.
    Thin,
    /// Medium continuous line.
    Medium,
    /// Dashed line.
    Dashed,
    /// Dotted line.
    Dotted,
    /// Thick continuous line.
    Thick,
    /// Double line.
    Double,
    /// Hairline.
    Hair,
    /// Medium dashed line.
    MediumDashed,
    /// Dash-dot line.
    DashDot,
    /// Medium dash-dot line.
    MediumDashDot,
    /// Dash-dot-dot line.
    DashDotDot,
    /// Medium dash-dot-dot line.
    MediumDashDotDot,
    /// Slanted dash-dot line.
    SlantDashDot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(CellBorders::default().is_empty());

        let bordered = CellBorders {
            top: Some(BorderEdge {
                line: BorderLineStyle::Thin,
                color: None,
            }),
            ..Default::default()
        };
        assert!(!bordered.is_empty());
    }
}
