//! # General utilities

use std::fmt;

mod writer;

pub use writer::{create_output, ByteWriter, Checksum};

/// Hex view of a byte slice
///
/// The plain form separates bytes with spaces, the alternate form (`{:#?}`)
/// prints rows of 16 bytes prefixed with their offset.
#[derive(Clone, Copy)]
pub struct Buf<'a>(pub &'a [u8]);

impl fmt::Debug for Buf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            for (index, byte) in self.0.iter().enumerate() {
                if index > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{:02X}", byte)?;
            }
            return Ok(());
        }
        for (row, chunk) in self.0.chunks(16).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "{:04X}:", row * 16)?;
            for byte in chunk {
                write!(f, " {:02X}", byte)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Buf;

    #[test]
    fn test_buf_rows() {
        let data: Vec<u8> = (0..18).collect();
        let text = format!("{:#?}", Buf(&data));
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("0000: 00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F")
        );
        assert_eq!(lines.next(), Some("0010: 10 11"));
        assert_eq!(lines.next(), None);
        assert_eq!(format!("{:?}", Buf(&[0x1B, 0x2A])), "1B 2A");
        assert_eq!(format!("{:#?}", Buf(&[])), "");
    }
}
