//! # PCL escape sequences
//!
//! All sequences used here are *parameterized* escape sequences of the form
//! `ESC <parameterized char> <group char> <value> <terminator>`, where the value
//! is written as ASCII decimal digits.

use std::{fmt, io};

/// The escape character (ASCII 27)
pub const ESC: u8 = 0x1B;

/// A parameterized PCL escape sequence
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Escape {
    /// The parameterized character
    pub parameterized: u8,
    /// The group character
    pub group: u8,
    /// The (upper case) termination character
    pub terminator: u8,
}

impl Escape {
    /// `ESC * c # R` - symbol set ID code
    pub const SYMBOL_SET_ID: Escape = Escape::new(b'*', b'c', b'R');
    /// `ESC ( f # W` - define symbol set
    pub const DEFINE_SYMBOL_SET: Escape = Escape::new(b'(', b'f', b'W');
    /// `ESC ) s # W` - font header
    pub const FONT_HEADER: Escape = Escape::new(b')', b's', b'W');
    /// `ESC * c # E` - character code
    pub const CHAR_CODE: Escape = Escape::new(b'*', b'c', b'E');
    /// `ESC ( s # W` - character descriptor and data
    pub const CHAR_DATA: Escape = Escape::new(b'(', b's', b'W');

    /// Create a new sequence description
    pub const fn new(parameterized: u8, group: u8, terminator: u8) -> Self {
        Self {
            parameterized,
            group,
            terminator,
        }
    }

    /// The three bytes that start the sequence
    pub const fn introducer(&self) -> [u8; 3] {
        [ESC, self.parameterized, self.group]
    }

    /// Write the sequence with the given value
    ///
    /// ```
    /// use pcl::escape::Escape;
    ///
    /// let mut out = Vec::new();
    /// Escape::CHAR_CODE.write(&mut out, 65).unwrap();
    /// assert_eq!(out, b"\x1B*c65E");
    /// ```
    pub fn write<W: io::Write>(&self, w: &mut W, value: u64) -> io::Result<()> {
        w.write_all(&self.introducer())?;
        write!(w, "{}", value)?;
        w.write_all(&[self.terminator])
    }
}

impl fmt::Debug for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Esc>{}{}#{}",
            char::from(self.parameterized),
            char::from(self.group),
            char::from(self.terminator)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Escape;

    fn encode(esc: Escape, value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        esc.write(&mut out, value).unwrap();
        out
    }

    #[test]
    fn test_escape_sequences() {
        assert_eq!(encode(Escape::SYMBOL_SET_ID, 629), b"\x1B*c629R");
        assert_eq!(encode(Escape::DEFINE_SYMBOL_SET, 530), b"\x1B(f530W");
        assert_eq!(encode(Escape::FONT_HEADER, 0), b"\x1B)s0W");
        assert_eq!(encode(Escape::CHAR_DATA, 65535), b"\x1B(s65535W");
        assert_eq!(format!("{:?}", Escape::CHAR_CODE), "<Esc>*c#E");
    }
}
