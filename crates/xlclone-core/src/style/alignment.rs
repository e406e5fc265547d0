//! Text alignment attributes

/// Alignment attributes captured for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    /// Horizontal alignment.
    pub horizontal: HorizontalAlignment,
    /// Vertical alignment.
    pub vertical: VerticalAlignment,
    /// Whether text wraps inside the cell.
    pub wrap_text: bool,
    /// Rotation in degrees, -90 to 90; zero means unrotated.
    pub rotation: i16,
    /// Indent level, 0 to 250.
    pub indent: u8,
}

impl Alignment {
    /// True when every attribute is the schema default; such an alignment
    /// carries nothing worth writing out.
    pub fn is_default(&self) -> bool {
        *self == Alignment::default()
    }
}

/// Horizontal alignment of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Default: text left, numbers right.
    #[default]
    General,
    /// Left aligned.
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
    /// Content repeated to fill the cell width.
    Fill,
    /// Justified.
    Justify,
    /// Distributed across the cell width.
    Distributed,
}

/// Vertical alignment of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    /// Aligned to the top.
    Top,
    /// Centered.
    Center,
    /// Default: aligned to the bottom.
    #[default]
    Bottom,
    /// Justified vertically.
    Justify,
    /// Distributed across the cell height.
    Distributed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let alignment = Alignment::default();
        assert_eq!(alignment.horizontal, HorizontalAlignment::General);
        assert_eq!(alignment.vertical, VerticalAlignment::Bottom);
        assert!(!alignment.wrap_text);
        assert!(alignment.is_default());
    }

    #[test]
    fn test_is_default_detects_changes() {
        let wrapped = Alignment {
            wrap_text: true,
            ..Default::default()
        };
        assert!(!wrapped.is_default());
    }
}
