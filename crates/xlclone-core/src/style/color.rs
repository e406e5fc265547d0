//! 24-bit RGB colors

use std::fmt;

/// A 24-bit color packed as `0xRRGGBB`.
///
/// This is the output schema's layout. Host colors arrive packed `0xBBGGRR`
/// and go through [`crate::translate::host_to_rgb`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(u32);

impl Rgb {
    /// Build from a packed `0xRRGGBB` value; bits above 24 are discarded.
    pub const fn new(packed: u32) -> Self {
        Rgb(packed & 0x00FF_FFFF)
    }

    /// Build from individual components.
    pub const fn from_components(r: u8, g: u8, b: u8) -> Self {
        Rgb(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// The packed `0xRRGGBB` value.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Red component.
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green component.
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue component.
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Six-digit uppercase hex without a prefix, e.g. `"FF8000"`.
    pub fn to_hex(self) -> String {
        format!("{:06X}", self.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_components() {
        let color = Rgb::from_components(0x12, 0x34, 0x56);
        assert_eq!(color.as_u32(), 0x123456);
        assert_eq!(color.r(), 0x12);
        assert_eq!(color.g(), 0x34);
        assert_eq!(color.b(), 0x56);
    }

    #[test]
    fn test_new_masks_high_bits() {
        assert_eq!(Rgb::new(0xFF12_3456), Rgb::new(0x0012_3456));
    }

    #[test]
    fn test_to_hex_pads() {
        assert_eq!(Rgb::new(0x00FF00).to_hex(), "00FF00");
        assert_eq!(Rgb::new(0x000001).to_hex(), "000001");
        assert_eq!(Rgb::new(0).to_string(), "#000000");
    }
}
