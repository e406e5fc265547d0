//! Host-native style codes to target-schema values
//!
//! Everything in this module is a pure function: host integers in, schema
//! values (or "nothing to apply") out. The host's sentinel codes are decoded
//! through closed enums with an explicit `Unknown` variant, so a gap in a
//! table is a visible match arm rather than a silent default.

use crate::host::{RawAlignment, RawBorderEdge, RawBorders, RawFont, RawInterior};
use crate::style::{
    Alignment, BorderEdge, BorderLineStyle, CellBorders, Fill, FontStyle, HorizontalAlignment,
    Rgb, Underline, VerticalAlignment,
};

/// Host underline codes (`xlUnderlineStyle*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostUnderline {
    /// No underline (-4142).
    None,
    /// Single underline (2).
    Single,
    /// Double underline (4).
    Double,
    /// Any other code, accounting underlines included.
    Unknown(i32),
}

impl HostUnderline {
    /// Decode a host underline code.
    pub fn from_code(code: i32) -> Self {
        match code {
            -4142 => HostUnderline::None,
            2 => HostUnderline::Single,
            4 => HostUnderline::Double,
            other => HostUnderline::Unknown(other),
        }
    }

    /// The schema underline; anything but single or double carries none.
    pub fn to_underline(self) -> Underline {
        match self {
            HostUnderline::Single => Underline::Single,
            HostUnderline::Double => Underline::Double,
            HostUnderline::None | HostUnderline::Unknown(_) => Underline::None,
        }
    }
}

/// Host interior pattern codes (`xlPattern*`). Only presence matters: the
/// pipeline renders every concrete pattern as a solid fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPattern {
    /// No pattern at all (-4142), meaning no fill.
    None,
    /// Any concrete pattern code.
    Patterned(i32),
}

impl HostPattern {
    /// Decode a host pattern code.
    pub fn from_code(code: i32) -> Self {
        match code {
            -4142 => HostPattern::None,
            other => HostPattern::Patterned(other),
        }
    }
}

/// Host horizontal alignment codes (`xlHAlign*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostHAlign {
    /// 1
    General,
    /// -4131
    Left,
    /// -4108
    Center,
    /// -4152
    Right,
    /// 5
    Fill,
    /// -4130
    Justify,
    /// 7
    Distributed,
    /// Any other code (center-across-selection included).
    Unknown(i32),
}

impl HostHAlign {
    /// Decode a host horizontal alignment code.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => HostHAlign::General,
            -4131 => HostHAlign::Left,
            -4108 => HostHAlign::Center,
            -4152 => HostHAlign::Right,
            5 => HostHAlign::Fill,
            -4130 => HostHAlign::Justify,
            7 => HostHAlign::Distributed,
            other => HostHAlign::Unknown(other),
        }
    }

    /// The schema alignment; unknown codes fall back to the general default.
    pub fn to_alignment(self) -> HorizontalAlignment {
        match self {
            HostHAlign::General => HorizontalAlignment::General,
            HostHAlign::Left => HorizontalAlignment::Left,
            HostHAlign::Center => HorizontalAlignment::Center,
            HostHAlign::Right => HorizontalAlignment::Right,
            HostHAlign::Fill => HorizontalAlignment::Fill,
            HostHAlign::Justify => HorizontalAlignment::Justify,
            HostHAlign::Distributed => HorizontalAlignment::Distributed,
            HostHAlign::Unknown(_) => HorizontalAlignment::General,
        }
    }
}

/// Host vertical alignment codes (`xlVAlign*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostVAlign {
    /// -4160
    Top,
    /// -4108
    Center,
    /// -4107
    Bottom,
    /// -4130
    Justify,
    /// 5
    Distributed,
    /// Any other code.
    Unknown(i32),
}

impl HostVAlign {
    /// Decode a host vertical alignment code.
    pub fn from_code(code: i32) -> Self {
        match code {
            -4160 => HostVAlign::Top,
            -4108 => HostVAlign::Center,
            -4107 => HostVAlign::Bottom,
            -4130 => HostVAlign::Justify,
            5 => HostVAlign::Distributed,
            other => HostVAlign::Unknown(other),
        }
    }

    /// The schema alignment; unknown codes fall back to the bottom default.
    pub fn to_alignment(self) -> VerticalAlignment {
        match self {
            HostVAlign::Top => VerticalAlignment::Top,
            HostVAlign::Center => VerticalAlignment::Center,
            HostVAlign::Bottom => VerticalAlignment::Bottom,
            HostVAlign::Justify => VerticalAlignment::Justify,
            HostVAlign::Distributed => VerticalAlignment::Distributed,
            HostVAlign::Unknown(_) => VerticalAlignment::Bottom,
        }
    }
}

/// Host border line styles. The host splits these across a line-style code
/// and a weight; the bridge resolves the pair into this single 1-13 code
/// before it reaches the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostLineStyle {
    /// 1
    Thin,
    /// 2
    Medium,
    /// 3
    Dashed,
    /// 4
    Dotted,
    /// 5
    Thick,
    /// 6
    Double,
    /// 7
    Hair,
    /// 8
    MediumDashed,
    /// 9
    DashDot,
    /// 10
    MediumDashDot,
    /// 11
    DashDotDot,
    /// 12
    MediumDashDotDot,
    /// 13
    SlantDashDot,
    /// Any other code, "no line" (-4142) included.
    Unknown(i32),
}

impl HostLineStyle {
    /// Decode a resolved host line-style code.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => HostLineStyle::Thin,
            2 => HostLineStyle::Medium,
            3 => HostLineStyle::Dashed,
            4 => HostLineStyle::Dotted,
            5 => HostLineStyle::Thick,
            6 => HostLineStyle::Double,
            7 => HostLineStyle::Hair,
            8 => HostLineStyle::MediumDashed,
            9 => HostLineStyle::DashDot,
            10 => HostLineStyle::MediumDashDot,
            11 => HostLineStyle::DashDotDot,
            12 => HostLineStyle::MediumDashDotDot,
            13 => HostLineStyle::SlantDashDot,
            other => HostLineStyle::Unknown(other),
        }
    }

    /// The schema line style, or `None` for codes with no mapping; the edge
    /// is then left without a border rather than guessed.
    pub fn to_line_style(self) -> Option<BorderLineStyle> {
        match self {
            HostLineStyle::Thin => Some(BorderLineStyle::Thin),
            HostLineStyle::Medium => Some(BorderLineStyle::Medium),
            HostLineStyle::Dashed => Some(BorderLineStyle::Dashed),
            HostLineStyle::Dotted => Some(BorderLineStyle::Dotted),
            HostLineStyle::Thick => Some(BorderLineStyle::Thick),
            HostLineStyle::Double => Some(BorderLineStyle::Double),
            HostLineStyle::Hair => Some(BorderLineStyle::Hair),
            HostLineStyle::MediumDashed => Some(BorderLineStyle::MediumDashed),
            HostLineStyle::DashDot => Some(BorderLineStyle::DashDot),
            HostLineStyle::MediumDashDot => Some(BorderLineStyle::MediumDashDot),
            HostLineStyle::DashDotDot => Some(BorderLineStyle::DashDotDot),
            HostLineStyle::MediumDashDotDot => Some(BorderLineStyle::MediumDashDotDot),
            HostLineStyle::SlantDashDot => Some(BorderLineStyle::SlantDashDot),
            HostLineStyle::Unknown(_) => None,
        }
    }
}

/// Convert a host `0xBBGGRR` color to the schema's `0xRRGGBB` packing.
///
/// Symmetric with [`rgb_to_host`]: converting there and back reproduces the
/// original 24-bit value.
pub fn host_to_rgb(host: u32) -> Rgb {
    let b = (host >> 16) & 0xFF;
    let g = (host >> 8) & 0xFF;
    let r = host & 0xFF;
    Rgb::new((r << 16) | (g << 8) | b)
}

/// Convert a schema color back to the host's `0xBBGGRR` packing.
pub fn rgb_to_host(rgb: Rgb) -> u32 {
    let v = rgb.as_u32();
    let r = (v >> 16) & 0xFF;
    let g = (v >> 8) & 0xFF;
    let b = v & 0xFF;
    (b << 16) | (g << 8) | r
}

/// Host colors travel as wide integers; only the low 24 bits are color.
fn host_color(raw: i64) -> Rgb {
    host_to_rgb(raw as u32 & 0x00FF_FFFF)
}

/// Translate a raw host font.
///
/// Returns `None` when nothing beyond the defaults was captured. A color
/// code of zero is treated as absent: an unset host font color reads back as
/// plain zero and must not become an explicit black.
pub fn translate_font(raw: &RawFont) -> Option<FontStyle> {
    let mut font = FontStyle {
        name: raw.name.clone(),
        size: raw.size,
        bold: raw.bold.unwrap_or(false),
        italic: raw.italic.unwrap_or(false),
        strikethrough: raw.strikethrough.unwrap_or(false),
        ..Default::default()
    };
    if let Some(code) = raw.underline {
        font.underline = HostUnderline::from_code(code).to_underline();
    }
    if let Some(color) = raw.color {
        if color != 0 {
            font.color = Some(host_color(color));
        }
    }
    if font.is_default() {
        None
    } else {
        Some(font)
    }
}

/// Translate a raw host interior.
///
/// The no-pattern sentinel (or an unreadable pattern) means no fill; any
/// concrete pattern becomes a solid fill of the interior color.
pub fn translate_interior(raw: &RawInterior) -> Option<Fill> {
    match HostPattern::from_code(raw.pattern?) {
        HostPattern::None => None,
        HostPattern::Patterned(_) => raw.color.map(|c| Fill {
            color: host_color(c),
        }),
    }
}

/// Translate raw host alignment codes.
///
/// Never fails: an unknown or unreadable code falls back to the schema
/// default (general / bottom), which is how the host renders such cells.
pub fn translate_alignment(raw: &RawAlignment) -> Alignment {
    Alignment {
        horizontal: raw
            .horizontal
            .map(|code| HostHAlign::from_code(code).to_alignment())
            .unwrap_or_default(),
        vertical: raw
            .vertical
            .map(|code| HostVAlign::from_code(code).to_alignment())
            .unwrap_or_default(),
        wrap_text: raw.wrap_text.unwrap_or(false),
        rotation: translate_rotation(raw.orientation),
        indent: raw.indent_level.unwrap_or(0).clamp(0, 250) as u8,
    }
}

/// The host encodes special orientations (vertical text, up, down) as large
/// magic values; only literal degree angles survive translation.
fn translate_rotation(raw: Option<i32>) -> i16 {
    match raw {
        Some(deg) if (-90..=90).contains(&deg) => deg as i16,
        _ => 0,
    }
}

/// Translate raw host borders edge by edge.
///
/// An unmapped line-style code yields no border on that edge; returns `None`
/// when no edge ends up with a line.
pub fn translate_borders(raw: &RawBorders) -> Option<CellBorders> {
    let borders = CellBorders {
        left: raw.left.as_ref().and_then(translate_edge),
        right: raw.right.as_ref().and_then(translate_edge),
        top: raw.top.as_ref().and_then(translate_edge),
        bottom: raw.bottom.as_ref().and_then(translate_edge),
    };
    if borders.is_empty() {
        None
    } else {
        Some(borders)
    }
}

fn translate_edge(raw: &RawBorderEdge) -> Option<BorderEdge> {
    let line = HostLineStyle::from_code(raw.line_style).to_line_style()?;
    Some(BorderEdge {
        line,
        color: raw.color.map(host_color),
    })
}

/// Number formats pass through verbatim. "General" is the schema default and
/// is not carried as an explicit format.
pub fn translate_number_format(raw: Option<String>) -> Option<String> {
    raw.filter(|format| !format.is_empty() && format != "General")
}
