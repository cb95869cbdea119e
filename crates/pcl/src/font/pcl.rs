//! # PCL 5 framing
//!
//! The font header is introduced by `ESC ) s # W` and consists of the 72 byte
//! descriptor, the segments and a 2 byte trailer. The checksum covers
//! everything from byte 64 of the descriptor up to the trailer.
//!
//! Every character is a `ESC * c # E` character code sequence followed by
//! `ESC ( s # W` with a Format 15 character descriptor and the outline.

use std::io::{self, Write};

use super::{
    segment::{segments_len, SizeField},
    FontError, FontFraming, FontHeader, GlyphRecord, Spacing,
};
use crate::{escape::Escape, util::ByteWriter};

/// Size of the fixed descriptor
pub const DESCRIPTOR_SIZE: u16 = 72;

/// Offset of the first descriptor byte covered by the checksum
pub const CHECKSUM_START: u16 = 64;

/// Scaling technology byte for TrueType
const SCALING_TRUETYPE: u8 = 1;

/// The character descriptor: format 15, no continuation, size 2, class 15
const CHAR_DESCRIPTOR: [u8; 4] = [15, 0, 2, 15];

/// The scalable font header formats
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeaderFormat {
    /// Format 15, header length up to 65535 bytes
    Format15,
    /// Format 16 "universal" header with 4 byte segment sizes
    Format16,
}

impl HeaderFormat {
    /// The format byte of the descriptor
    pub fn id(self) -> u8 {
        match self {
            Self::Format15 => 15,
            Self::Format16 => 16,
        }
    }

    /// The size field of the segments
    pub fn size_field(self) -> SizeField {
        match self {
            Self::Format15 => SizeField::Short,
            Self::Format16 => SizeField::Long,
        }
    }

    /// The maximum header length
    pub fn max_length(self) -> u64 {
        match self {
            Self::Format15 => u64::from(u16::MAX),
            Self::Format16 => u64::from(u32::MAX),
        }
    }
}

fn clamp_u16(value: i32) -> u16 {
    value.clamp(0, i32::from(u16::MAX)) as u16
}

fn write_descriptor<W: Write>(
    out: &mut ByteWriter<W>,
    header: &FontHeader<'_>,
    format: HeaderFormat,
) -> io::Result<()> {
    let meta = header.meta;
    let metrics = &header.metrics;
    let [style_msb, style_lsb] = meta.style.to_be_bytes();
    let [typeface_msb, typeface_lsb] = meta.typeface.to_be_bytes();
    let em_height = clamp_u16(i32::from(meta.ascender) - i32::from(meta.descender));

    out.write_u16(DESCRIPTOR_SIZE)?;
    out.write_u8(format.id())?;
    out.write_u8(meta.symbol_set_type.font_type())?;
    out.write_u8(style_msb)?;
    out.write_u8(0)?;
    out.write_u16(clamp_u16(meta.ascender.into()))?; // baseline position
    out.write_u16(meta.cell_width)?;
    out.write_u16(em_height)?; // cell height
    out.write_u8(meta.orientation)?;
    out.write_u8(match meta.spacing {
        Spacing::Fixed => 0,
        Spacing::Proportional => 1,
    })?;
    out.write_u16(meta.header_symbol_set().0)?;
    out.write_u16(meta.pitch())?;
    out.write_u16(0)?; // height, bitmap only
    out.write_u16(meta.x_height)?;
    out.write_i8(meta.width_type)?;
    out.write_u8(style_lsb)?;
    out.write_i8(meta.stroke_weight)?;
    out.write_u8(typeface_lsb)?;
    out.write_u8(typeface_msb)?;
    out.write_u8(meta.serif_style)?;
    out.write_u8(meta.quality)?;
    out.write_i8(meta.placement)?;
    out.write_i8(0)?; // underline position, bitmap only
    out.write_u8(0)?; // underline thickness, bitmap only
    out.write_u16(em_height)?; // text height
    out.write_u16(meta.average_width)?; // text width
    out.write_u16(metrics.first_code)?;
    out.write_u16(metrics.last_code)?;
    out.write_u8(0)?; // pitch extended, design units have no fraction
    out.write_u8(0)?; // height extended
    out.write_u16(meta.cap_height)?;
    out.write_u32(meta.font_number)?;
    out.write_bytes(&meta.name_bytes())?;

    out.begin_checksum();
    out.write_u16(metrics.units_per_em)?; // scale factor
    out.write_i16(meta.underline_position)?;
    out.write_u16(meta.underline_thickness)?;
    out.write_u8(SCALING_TRUETYPE)?;
    out.write_u8(meta.variety)
}

/// Writes fonts as PCL 5 escape sequences
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PclFraming {
    format: HeaderFormat,
}

impl PclFraming {
    /// Use the given header format
    pub fn new(format: HeaderFormat) -> Self {
        Self { format }
    }

    /// The header format
    pub fn format(&self) -> HeaderFormat {
        self.format
    }
}

impl FontFraming for PclFraming {
    fn write_header<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        header: &FontHeader<'_>,
    ) -> Result<u64, FontError> {
        let size = self.format.size_field();
        let length = u64::from(DESCRIPTOR_SIZE) + segments_len(&header.segments, size) + 2;
        let limit = self.format.max_length();
        if length > limit {
            return Err(FontError::HeaderTooLarge { length, limit });
        }

        // `ESC ) s # W` downloads a font header, `ESC ( f # W` only defines symbol sets
        Escape::FONT_HEADER.write(out, length)?;
        write_descriptor(out, header, self.format)?;
        for segment in &header.segments {
            segment.write(out, size)?;
        }
        let sum = out.take_checksum();
        out.write_u8(0)?;
        out.write_u8(sum.complement())?;
        Ok(length)
    }

    fn write_char<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        char_code: u16,
        glyph: &GlyphRecord,
        outline: &[u8],
    ) -> Result<(), FontError> {
        let data_size = 4 + outline.len() as u64;
        let data_size16 = u16::try_from(data_size).map_err(|_| FontError::GlyphTooLarge {
            glyph: glyph.glyph_id,
            size: data_size,
        })?;

        Escape::CHAR_CODE.write(out, char_code.into())?;
        Escape::CHAR_DATA.write(out, CHAR_DESCRIPTOR.len() as u64 + data_size + 2)?;
        out.write_bytes(&CHAR_DESCRIPTOR)?;
        out.begin_checksum();
        out.write_u16(data_size16)?;
        out.write_u16(glyph.glyph_id)?;
        out.write_bytes(outline)?;
        let sum = out.take_checksum();
        out.write_u8(0)?;
        out.write_u8(sum.complement())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{HeaderFormat, PclFraming, CHECKSUM_START};
    use crate::{
        font::{
            BasicMetrics, FontError, FontFraming, FontHeader, FontMetadata, GlyphRecord, Segment,
            SegmentTag,
        },
        symset::SymbolSetId,
        util::ByteWriter,
    };

    fn header(meta: &FontMetadata, segments: Vec<Segment<'static>>) -> Vec<u8> {
        let header = FontHeader {
            meta,
            metrics: BasicMetrics {
                first_code: 0x20,
                last_code: 0xFF,
                units_per_em: 2048,
                ..BasicMetrics::default()
            },
            segments,
            unbound: false,
            vertical: false,
        };
        let mut out = ByteWriter::new(Vec::new());
        let length = PclFraming::new(HeaderFormat::Format15)
            .write_header(&mut out, &header)
            .unwrap();
        let bytes = out.into_inner();
        let prefix = 4 + length.to_string().len();
        assert_eq!(bytes.len(), prefix + length as usize);
        bytes
    }

    #[test]
    fn test_descriptor_fields() {
        let meta = FontMetadata {
            font_name: String::from("Test"),
            typeface: 0x1234,
            style: 0x0102,
            symbol_set: SymbolSetId::WIN_LATIN_1,
            ascender: 1800,
            descender: -400,
            ..FontMetadata::default()
        };
        let bytes = header(&meta, vec![Segment::null()]);
        assert!(bytes.starts_with(b"\x1B)s78W"));
        let desc = &bytes[6..];
        assert_eq!(&desc[0..4], &[0, 72, 15, 2]);
        assert_eq!(desc[4], 0x01); // style MSB
        assert_eq!(&desc[6..8], &1800u16.to_be_bytes());
        assert_eq!(&desc[10..12], &2200u16.to_be_bytes());
        assert_eq!(&desc[14..16], &629u16.to_be_bytes());
        assert_eq!(desc[23], 0x02); // style LSB
        assert_eq!(&desc[25..27], &[0x34, 0x12]);
        assert_eq!(&desc[36..40], &[0x00, 0x20, 0x00, 0xFF]);
        assert_eq!(&desc[48..64], b"Test            ");
        assert_eq!(&desc[64..66], &2048u16.to_be_bytes());
        assert_eq!(desc[70], 1);
        assert_eq!(&desc[72..76], &[0xFF, 0xFF, 0x00, 0x00]);
        assert_eq!(desc.len(), 78);
        assert_eq!(&desc[16..18], &[0, 0]);
        assert_eq!(desc[40], 0);

        let sum = desc[usize::from(CHECKSUM_START)..]
            .iter()
            .fold(0u8, |a, b| a.wrapping_add(*b));
        assert_eq!(sum, 0);
    }

    #[test]
    fn test_pitch_field() {
        let meta = FontMetadata {
            space_width: 569,
            average_width: 1100,
            ..FontMetadata::default()
        };
        let bytes = header(&meta, vec![Segment::null()]);
        assert_eq!(&bytes[6 + 16..6 + 18], &569u16.to_be_bytes());

        let meta = FontMetadata {
            space_width: 0,
            average_width: 1100,
            ..FontMetadata::default()
        };
        let bytes = header(&meta, vec![Segment::null()]);
        assert_eq!(&bytes[6 + 16..6 + 18], &1100u16.to_be_bytes());
    }

    #[test]
    fn test_header_too_large() {
        let meta = FontMetadata::default();
        let header = FontHeader {
            meta: &meta,
            metrics: BasicMetrics::default(),
            segments: vec![
                Segment::new(SegmentTag::GLOBAL_TRUETYPE, vec![0; 0xFFF0]),
                Segment::null(),
            ],
            unbound: false,
            vertical: false,
        };
        let mut out = ByteWriter::new(Vec::new());
        match PclFraming::new(HeaderFormat::Format15).write_header(&mut out, &header) {
            Err(FontError::HeaderTooLarge { length, limit }) => {
                assert_eq!(length, 72 + 0xFFF4 + 4 + 2);
                assert_eq!(limit, 0xFFFF);
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(out.position(), 0);

        let mut out = ByteWriter::new(Vec::new());
        let length = PclFraming::new(HeaderFormat::Format16)
            .write_header(&mut out, &header)
            .unwrap();
        assert_eq!(length, 72 + 0xFFF6 + 6 + 2);
    }

    #[test]
    fn test_char_record() {
        let glyph = GlyphRecord {
            glyph_id: 3,
            ..GlyphRecord::default()
        };
        let mut out = ByteWriter::new(Vec::new());
        PclFraming::new(HeaderFormat::Format15)
            .write_char(&mut out, 0x41, &glyph, &[0x12, 0x34, 0x56])
            .unwrap();
        let bytes = out.into_inner();
        assert!(bytes.starts_with(b"\x1B*c65E\x1B(s13W"));
        let record = &bytes[12..];
        assert_eq!(
            record,
            &[15, 0, 2, 15, 0x00, 0x07, 0x00, 0x03, 0x12, 0x34, 0x56, 0x00, 0x5A]
        );
        let sum = record[4..].iter().fold(0u8, |a, b| a.wrapping_add(*b));
        assert_eq!(sum, 0);
    }
}
