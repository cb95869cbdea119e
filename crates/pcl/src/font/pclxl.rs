//! # PCL XL framing
//!
//! The font header is a Format 0 descriptor of 8 bytes followed by the
//! segments, transferred in blocks of `ReadFontHeader` embedded data between
//! `BeginFontHeader` and `EndFontHeader`. There is no checksum.
//!
//! Characters are sent with `ReadChar` between `BeginChar` and `EndChar`.
//! The character header depends on the class: class 0 has only size and
//! glyph id, class 1 adds left side bearing and advance width, class 2 adds
//! the top side bearing.

use std::io::Write;

use super::{segment::SizeField, FontError, FontFraming, FontHeader, GlyphRecord};
use crate::{
    util::ByteWriter,
    xl::{Attribute, Operator, XlWriter},
};

/// Maximum size of the embedded data of a single `ReadFontHeader`
pub const HEADER_CHUNK_SIZE: usize = 0x4000;

/// Format of the font header
const FONT_FORMAT: u8 = 0;

/// Format of the character data
const CHAR_FORMAT: u8 = 1;

/// The class of a TrueType character header
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CharClass {
    /// Glyph id only
    Class0,
    /// Horizontal metrics
    Class1,
    /// Horizontal and vertical metrics
    Class2,
}

impl CharClass {
    /// Pick the class for a font
    ///
    /// ```
    /// use pcl::font::CharClass;
    ///
    /// assert_eq!(CharClass::select(false, false), CharClass::Class0);
    /// assert_eq!(CharClass::select(true, false), CharClass::Class1);
    /// assert_eq!(CharClass::select(false, true), CharClass::Class2);
    /// ```
    pub fn select(unbound: bool, vertical: bool) -> Self {
        if vertical {
            Self::Class2
        } else if unbound {
            Self::Class1
        } else {
            Self::Class0
        }
    }

    /// The class byte
    pub fn id(self) -> u8 {
        match self {
            Self::Class0 => 0,
            Self::Class1 => 1,
            Self::Class2 => 2,
        }
    }
}

fn header_data(header: &FontHeader<'_>) -> Result<Vec<u8>, FontError> {
    let meta = header.meta;
    let mut data = ByteWriter::new(Vec::new());
    data.write_u8(FONT_FORMAT)?;
    data.write_u8(meta.orientation)?;
    data.write_u16(meta.header_symbol_set().0)?;
    data.write_u8(1)?; // TrueType
    data.write_u8(meta.variety)?;
    data.write_u16(header.metrics.num_chars)?;
    for segment in &header.segments {
        segment.write(&mut data, SizeField::Long)?;
    }
    Ok(data.into_inner())
}

/// Writes fonts as PCL XL operators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PclXlFraming {
    font_name: [u8; 16],
    stream_header: Option<String>,
    class: CharClass,
}

impl PclXlFraming {
    /// Create a framing for the given font name
    ///
    /// If a comment is given, the output starts with a stream header.
    pub fn new(font_name: [u8; 16], stream_header: Option<String>) -> Self {
        Self {
            font_name,
            stream_header,
            class: CharClass::Class0,
        }
    }

    /// The class of the character headers, set by the font header
    pub fn class(&self) -> CharClass {
        self.class
    }

    fn char_header(&self, glyph: &GlyphRecord, char_size: u16) -> Vec<u8> {
        let mut head = Vec::with_capacity(12);
        head.extend_from_slice(&[CHAR_FORMAT, self.class.id()]);
        if self.class != CharClass::Class0 {
            head.extend_from_slice(&glyph.left_side_bearing.to_be_bytes());
            head.extend_from_slice(&glyph.advance_width.to_be_bytes());
        }
        if self.class == CharClass::Class2 {
            head.extend_from_slice(&glyph.top_side_bearing.to_be_bytes());
        }
        head.extend_from_slice(&char_size.to_be_bytes());
        head.extend_from_slice(&glyph.glyph_id.to_be_bytes());
        head
    }
}

impl FontFraming for PclXlFraming {
    fn write_header<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        header: &FontHeader<'_>,
    ) -> Result<u64, FontError> {
        self.class = CharClass::select(header.unbound, header.vertical);
        let data = header_data(header)?;

        let mut xl = XlWriter::new(out);
        if let Some(comment) = &self.stream_header {
            xl.stream_header(comment)?;
        }
        xl.attr_ubyte_array(Attribute::FONT_NAME, &self.font_name)?;
        xl.attr_ubyte(Attribute::FONT_FORMAT, FONT_FORMAT)?;
        xl.operator(Operator::BEGIN_FONT_HEADER)?;
        for chunk in data.chunks(HEADER_CHUNK_SIZE) {
            let len = chunk.len() as u16;
            xl.attr_uint16(Attribute::FONT_HEADER_LENGTH, len)?;
            xl.operator(Operator::READ_FONT_HEADER)?;
            xl.embedded_data(len.into())?;
            xl.payload(chunk)?;
        }
        xl.operator(Operator::END_FONT_HEADER)?;
        Ok(data.len() as u64)
    }

    fn begin_characters<W: Write>(&mut self, out: &mut ByteWriter<W>) -> Result<(), FontError> {
        let mut xl = XlWriter::new(out);
        xl.attr_ubyte_array(Attribute::FONT_NAME, &self.font_name)?;
        xl.operator(Operator::BEGIN_CHAR)?;
        Ok(())
    }

    fn write_char<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        char_code: u16,
        glyph: &GlyphRecord,
        outline: &[u8],
    ) -> Result<(), FontError> {
        let char_size = 4 + outline.len() as u64;
        let too_large = || FontError::GlyphTooLarge {
            glyph: glyph.glyph_id,
            size: char_size,
        };
        let head = self.char_header(glyph, u16::try_from(char_size).map_err(|_| too_large())?);
        let total = u32::try_from(head.len() + outline.len()).map_err(|_| too_large())?;

        let mut xl = XlWriter::new(out);
        xl.attr_uint16(Attribute::CHAR_CODE, char_code)?;
        xl.attr_size(Attribute::CHAR_DATA_SIZE, total)?;
        xl.operator(Operator::READ_CHAR)?;
        xl.embedded_data(total)?;
        xl.payload(&head)?;
        xl.payload(outline)?;
        Ok(())
    }

    fn end_characters<W: Write>(&mut self, out: &mut ByteWriter<W>) -> Result<(), FontError> {
        XlWriter::new(out).operator(Operator::END_CHAR)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CharClass, PclXlFraming};
    use crate::{
        font::{BasicMetrics, FontFraming, FontHeader, FontMetadata, GlyphRecord, Segment},
        symset::SymbolSetType,
        util::ByteWriter,
    };

    fn glyph() -> GlyphRecord {
        GlyphRecord {
            glyph_id: 0x0102,
            advance_width: 500,
            left_side_bearing: -20,
            top_side_bearing: 30,
            ..GlyphRecord::default()
        }
    }

    #[test]
    fn test_header_blocks() {
        let meta = FontMetadata {
            symbol_set_type: SymbolSetType::Unbound,
            ..FontMetadata::default()
        };
        let header = FontHeader {
            meta: &meta,
            metrics: BasicMetrics {
                num_chars: 3,
                ..BasicMetrics::default()
            },
            segments: vec![Segment::null()],
            unbound: true,
            vertical: false,
        };
        let mut framing = PclXlFraming::new(*b"ABCDEFGHIJKLMNOP", None);
        let mut out = ByteWriter::new(Vec::new());
        let length = framing.write_header(&mut out, &header).unwrap();
        assert_eq!(length, 14);
        assert_eq!(framing.class(), CharClass::Class1);

        let bytes = out.into_inner();
        let mut expected = vec![0xC8, 0xC1, 16, 0];
        expected.extend_from_slice(b"ABCDEFGHIJKLMNOP");
        expected.extend_from_slice(&[0xF8, 0xA8, 0xC0, 0x00, 0xF8, 0xA9, 0x4F]);
        expected.extend_from_slice(&[0xC1, 14, 0, 0xF8, 0xA7, 0x50, 0xFB, 14]);
        expected.extend_from_slice(&[0, 0, 0x07, 0x0E, 1, 0, 0, 3]);
        expected.extend_from_slice(&[0xFF, 0xFF, 0, 0, 0, 0]);
        expected.push(0x51);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_stream_header() {
        let meta = FontMetadata::default();
        let header = FontHeader {
            meta: &meta,
            metrics: BasicMetrics::default(),
            segments: vec![Segment::null()],
            unbound: false,
            vertical: false,
        };
        let mut framing = PclXlFraming::new([b' '; 16], Some(String::from("test")));
        let mut out = ByteWriter::new(Vec::new());
        framing.write_header(&mut out, &header).unwrap();
        assert!(out
            .into_inner()
            .starts_with(b") HP-PCL XL;2;1;Comment test\n\xC8"));
    }

    fn char_bytes(class: CharClass) -> Vec<u8> {
        let mut framing = PclXlFraming::new([b' '; 16], None);
        framing.class = class;
        let mut out = ByteWriter::new(Vec::new());
        framing
            .write_char(&mut out, 0x41, &glyph(), &[0xAA, 0xBB])
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_char_classes() {
        let prefix = [0xC1, 0x41, 0x00, 0xF8, 0xA2];
        assert_eq!(
            char_bytes(CharClass::Class0),
            [
                &prefix[..],
                &[0xC1, 8, 0, 0xF8, 0xA3, 0x53, 0xFB, 8],
                &[1, 0, 0, 6, 0x01, 0x02, 0xAA, 0xBB],
            ]
            .concat()
        );
        assert_eq!(
            char_bytes(CharClass::Class1),
            [
                &prefix[..],
                &[0xC1, 12, 0, 0xF8, 0xA3, 0x53, 0xFB, 12],
                &[1, 1, 0xFF, 0xEC, 0x01, 0xF4, 0, 6, 0x01, 0x02, 0xAA, 0xBB],
            ]
            .concat()
        );
        assert_eq!(
            char_bytes(CharClass::Class2),
            [
                &prefix[..],
                &[0xC1, 14, 0, 0xF8, 0xA3, 0x53, 0xFB, 14],
                &[1, 2, 0xFF, 0xEC, 0x01, 0xF4, 0, 30, 0, 6, 0x01, 0x02, 0xAA, 0xBB],
            ]
            .concat()
        );
    }
}
