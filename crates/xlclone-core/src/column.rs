//! Column-letter conversion
//!
//! Worksheet columns use a bijective base-26 numbering with no zero digit:
//! 1 -> A, 26 -> Z, 27 -> AA, 702 -> ZZ, 703 -> AAA.

use crate::error::{Error, Result};
use crate::MAX_COLS;

/// Convert a 1-based column number to its letters (1 -> "A", 27 -> "AA").
pub fn column_to_letters(col: u32) -> String {
    let mut letters = String::new();
    let mut n = col;
    while n > 0 {
        n -= 1;
        letters.insert(0, ((n % 26) as u8 + b'A') as char);
        n /= 26;
    }
    letters
}

/// Convert column letters back to the 1-based column number ("A" -> 1).
///
/// Accepts lowercase; rejects empty input, non-letters, and columns past
/// [`MAX_COLS`].
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress("empty column letters".to_string()));
    }
    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(format!(
                "invalid column letter '{c}' in \"{letters}\""
            )));
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        col = col * 26 + digit;
        if col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }
    }
    Ok(col)
}
