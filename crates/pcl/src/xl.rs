//! # PCL XL binary stream primitives
//!
//! PCL XL is an operator based protocol: attribute values are pushed first,
//! each followed by an attribute id, and then the operator consumes them.
//! Only the little-endian binary binding (`)`) is implemented, and only the
//! subset of tags needed to download soft fonts.

use std::{
    fmt,
    io::{self, Write},
};

use crate::util::ByteWriter;

/// Start of the stream header for the little-endian binding, protocol class 2.1
pub const STREAM_HEADER: &[u8] = b") HP-PCL XL;2;1;";

/// A data type tag
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct DataType(pub u8);

impl DataType {
    /// `ubyte`
    pub const UBYTE: Self = Self(0xC0);
    /// `uint16`
    pub const UINT16: Self = Self(0xC1);
    /// `uint32`
    pub const UINT32: Self = Self(0xC2);
    /// `ubyte_array`
    pub const UBYTE_ARRAY: Self = Self(0xC8);
    /// Attribute id (1 byte)
    pub const ATTR_UBYTE: Self = Self(0xF8);
    /// Embedded data, 4-byte length
    pub const EMBEDDED_DATA: Self = Self(0xFA);
    /// Embedded data, 1-byte length
    pub const EMBEDDED_DATA_BYTE: Self = Self(0xFB);
}

/// An operator tag
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Operator(pub u8);

impl Operator {
    /// `BeginFontHeader`
    pub const BEGIN_FONT_HEADER: Self = Self(0x4F);
    /// `ReadFontHeader`
    pub const READ_FONT_HEADER: Self = Self(0x50);
    /// `EndFontHeader`
    pub const END_FONT_HEADER: Self = Self(0x51);
    /// `BeginChar`
    pub const BEGIN_CHAR: Self = Self(0x52);
    /// `ReadChar`
    pub const READ_CHAR: Self = Self(0x53);
    /// `EndChar`
    pub const END_CHAR: Self = Self(0x54);

    fn name(&self) -> Option<&'static str> {
        match *self {
            Self::BEGIN_FONT_HEADER => Some("BeginFontHeader"),
            Self::READ_FONT_HEADER => Some("ReadFontHeader"),
            Self::END_FONT_HEADER => Some("EndFontHeader"),
            Self::BEGIN_CHAR => Some("BeginChar"),
            Self::READ_CHAR => Some("ReadChar"),
            Self::END_CHAR => Some("EndChar"),
            _ => None,
        }
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "Operator(0x{:02X})", self.0),
        }
    }
}

/// An attribute id
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Attribute(pub u8);

impl Attribute {
    /// `CharCode`
    pub const CHAR_CODE: Self = Self(0xA2);
    /// `CharDataSize`
    pub const CHAR_DATA_SIZE: Self = Self(0xA3);
    /// `FontHeaderLength`
    pub const FONT_HEADER_LENGTH: Self = Self(0xA7);
    /// `FontName`
    pub const FONT_NAME: Self = Self(0xA8);
    /// `FontFormat`
    pub const FONT_FORMAT: Self = Self(0xA9);
}

/// Writes PCL XL tokens
pub struct XlWriter<'a, W> {
    out: &'a mut ByteWriter<W>,
}

impl<'a, W: Write> XlWriter<'a, W> {
    /// Write tokens to the given byte writer
    pub fn new(out: &'a mut ByteWriter<W>) -> Self {
        Self { out }
    }

    /// Write the stream header with a comment
    pub fn stream_header(&mut self, comment: &str) -> io::Result<()> {
        self.out.write_bytes(STREAM_HEADER)?;
        writeln!(self.out, "Comment {}", comment)
    }

    fn attr_id(&mut self, attr: Attribute) -> io::Result<()> {
        self.out.write_bytes(&[DataType::ATTR_UBYTE.0, attr.0])
    }

    /// Push a `ubyte` attribute
    pub fn attr_ubyte(&mut self, attr: Attribute, value: u8) -> io::Result<()> {
        self.out.write_bytes(&[DataType::UBYTE.0, value])?;
        self.attr_id(attr)
    }

    /// Push a `uint16` attribute
    pub fn attr_uint16(&mut self, attr: Attribute, value: u16) -> io::Result<()> {
        self.out.write_u8(DataType::UINT16.0)?;
        self.out.write_u16_le(value)?;
        self.attr_id(attr)
    }

    /// Push a `uint32` attribute
    pub fn attr_uint32(&mut self, attr: Attribute, value: u32) -> io::Result<()> {
        self.out.write_u8(DataType::UINT32.0)?;
        self.out.write_u32_le(value)?;
        self.attr_id(attr)
    }

    /// Push a `uint16` or `uint32` attribute, whichever fits
    pub fn attr_size(&mut self, attr: Attribute, value: u32) -> io::Result<()> {
        match u16::try_from(value) {
            Ok(small) => self.attr_uint16(attr, small),
            Err(_) => self.attr_uint32(attr, value),
        }
    }

    /// Push a `ubyte_array` attribute
    pub fn attr_ubyte_array(&mut self, attr: Attribute, value: &[u8]) -> io::Result<()> {
        let len = u16::try_from(value.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "array too long"))?;
        self.out.write_u8(DataType::UBYTE_ARRAY.0)?;
        self.out.write_u8(DataType::UINT16.0)?;
        self.out.write_u16_le(len)?;
        self.out.write_bytes(value)?;
        self.attr_id(attr)
    }

    /// Write an operator
    pub fn operator(&mut self, op: Operator) -> io::Result<()> {
        self.out.write_u8(op.0)
    }

    /// Write the length prefix of an embedded data block
    pub fn embedded_data(&mut self, len: u32) -> io::Result<()> {
        match u8::try_from(len) {
            Ok(short) => self.out.write_bytes(&[DataType::EMBEDDED_DATA_BYTE.0, short]),
            Err(_) => {
                self.out.write_u8(DataType::EMBEDDED_DATA.0)?;
                self.out.write_u32_le(len)
            }
        }
    }

    /// Write raw payload bytes
    pub fn payload(&mut self, data: &[u8]) -> io::Result<()> {
        self.out.write_bytes(data)
    }
}

#[cfg(test)]
mod tests {
    use super::{Attribute, Operator, XlWriter};
    use crate::util::ByteWriter;

    #[test]
    fn test_attribute_encoding() {
        let mut out = ByteWriter::new(Vec::new());
        let mut xl = XlWriter::new(&mut out);
        xl.attr_ubyte(Attribute::FONT_FORMAT, 0).unwrap();
        xl.attr_uint16(Attribute::CHAR_CODE, 0x0141).unwrap();
        xl.attr_size(Attribute::CHAR_DATA_SIZE, 0x0001_0000).unwrap();
        xl.attr_ubyte_array(Attribute::FONT_NAME, b"AB").unwrap();
        xl.operator(Operator::READ_CHAR).unwrap();
        assert_eq!(
            out.into_inner(),
            vec![
                0xC0, 0x00, 0xF8, 0xA9, //
                0xC1, 0x41, 0x01, 0xF8, 0xA2, //
                0xC2, 0x00, 0x00, 0x01, 0x00, 0xF8, 0xA3, //
                0xC8, 0xC1, 0x02, 0x00, b'A', b'B', 0xF8, 0xA8, //
                0x53,
            ]
        );
    }

    #[test]
    fn test_embedded_data_prefix() {
        let mut out = ByteWriter::new(Vec::new());
        let mut xl = XlWriter::new(&mut out);
        xl.embedded_data(12).unwrap();
        xl.embedded_data(300).unwrap();
        assert_eq!(
            out.into_inner(),
            vec![0xFB, 12, 0xFA, 0x2C, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn test_operator_debug() {
        assert_eq!(format!("{:?}", Operator::BEGIN_CHAR), "BeginChar");
        assert_eq!(format!("{:?}", Operator(0x41)), "Operator(0x41)");
    }
}
