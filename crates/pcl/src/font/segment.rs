//! # Font header segments
//!
//! Scalable font headers carry a list of tagged segments after the fixed
//! descriptor. Each segment has a 2 byte identifier and a size field of
//! 2 bytes (Format 15) or 4 bytes (Format 16 and PCL XL). The list ends
//! with the `NULL` segment.

use std::{borrow::Cow, fmt, io::Write};

use super::FontError;
use crate::{
    symset::{MapVariant, SymbolSetMap},
    util::ByteWriter,
};

/// A segment identifier
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct SegmentTag(pub [u8; 2]);

impl SegmentTag {
    /// `PA` - PANOSE classification
    pub const PANOSE: Self = Self(*b"PA");
    /// `CP` - copyright notice
    pub const COPYRIGHT: Self = Self(*b"CP");
    /// `SM` - the code point mapping of the bound symbol set
    pub const SYMBOL_MAP: Self = Self(*b"SM");
    /// `VR` - vertical rotation metrics
    pub const VERTICAL: Self = Self(*b"VR");
    /// `GC` - galley character
    pub const GALLEY: Self = Self(*b"GC");
    /// `CC` - character complement
    pub const COMPLEMENT: Self = Self(*b"CC");
    /// `GT` - global TrueType data
    pub const GLOBAL_TRUETYPE: Self = Self(*b"GT");
    /// End of the segment list
    pub const NULL: Self = Self([0xFF, 0xFF]);
}

impl fmt::Debug for SegmentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NULL {
            f.write_str("NULL")
        } else if self.0.iter().all(u8::is_ascii_graphic) {
            write!(f, "{}{}", char::from(self.0[0]), char::from(self.0[1]))
        } else {
            write!(f, "0x{:02X}{:02X}", self.0[0], self.0[1])
        }
    }
}

/// Width of the size field of a segment
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SizeField {
    /// 2 bytes (Format 15)
    Short,
    /// 4 bytes (Format 16, PCL XL)
    Long,
}

impl SizeField {
    /// Number of bytes of the field
    pub fn width(self) -> u64 {
        match self {
            Self::Short => 2,
            Self::Long => 4,
        }
    }
}

/// A font header segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The identifier
    pub tag: SegmentTag,
    /// The payload
    pub data: Cow<'a, [u8]>,
}

impl<'a> Segment<'a> {
    /// Create a segment
    pub fn new(tag: SegmentTag, data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            tag,
            data: data.into(),
        }
    }

    /// The `NULL` segment
    pub fn null() -> Self {
        Self::new(SegmentTag::NULL, Vec::new())
    }

    /// Size of the segment including tag and size field
    pub fn encoded_len(&self, size: SizeField) -> u64 {
        2 + size.width() + self.data.len() as u64
    }

    /// Write tag, size and payload
    pub fn write<W: Write>(&self, out: &mut ByteWriter<W>, size: SizeField) -> Result<(), FontError> {
        out.write_bytes(&self.tag.0)?;
        let len = self.data.len() as u64;
        match size {
            SizeField::Short => {
                let short = u16::try_from(len).map_err(|_| FontError::HeaderTooLarge {
                    length: len,
                    limit: u64::from(u16::MAX),
                })?;
                out.write_u16(short)?;
            }
            SizeField::Long => {
                let long = u32::try_from(len).map_err(|_| FontError::HeaderTooLarge {
                    length: len,
                    limit: u64::from(u32::MAX),
                })?;
                out.write_u32(long)?;
            }
        }
        out.write_bytes(&self.data)?;
        Ok(())
    }
}

/// Total size of a list of segments
pub fn segments_len(segments: &[Segment], size: SizeField) -> u64 {
    segments.iter().map(|s| s.encoded_len(size)).sum()
}

/// Serialize the ranges of a symbol set map
///
/// Each range is written as its first and last code followed by the mapped
/// code points.
pub fn symbol_map_data(map: &SymbolSetMap) -> Vec<u8> {
    let mut data = Vec::new();
    for (index, range) in map.ranges().iter().enumerate() {
        data.extend_from_slice(&range.min.to_be_bytes());
        data.extend_from_slice(&range.max.to_be_bytes());
        for value in map.values(index, MapVariant::Pcl) {
            data.extend_from_slice(&value.to_be_bytes());
        }
    }
    data
}

/// `VR` payload: format 0 and the descender
pub fn vertical_data(descender: i16) -> Vec<u8> {
    let [hi, lo] = descender.to_be_bytes();
    vec![0, 0, hi, lo]
}

/// `GC` payload for a galley character at glyph 0
pub const GALLEY_DATA: [u8; 12] = [
    0x00, 0x00, // format
    0xFF, 0xFF, // default galley character
    0x00, 0x01, // number of regions
    0xFF, 0xFF, 0xFF, 0xFF, // region covers all codes
    0x00, 0x00, // glyph 0
];

/// Default `CC` payload: all character requirements
pub const DEFAULT_COMPLEMENT: [u8; 8] = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE];

/// `CP` payload: ASCII text with a terminating NUL
pub fn copyright_data(text: &str) -> Vec<u8> {
    let mut data: Vec<u8> = text
        .chars()
        .map(|c| if c.is_ascii() && c != '\0' { c as u8 } else { b'?' })
        .collect();
    data.push(0);
    data
}

#[cfg(test)]
mod tests {
    use super::{copyright_data, symbol_map_data, Segment, SegmentTag, SizeField};
    use crate::{symset::SymbolSetMap, util::ByteWriter};

    #[test]
    fn test_tag_debug() {
        assert_eq!(format!("{:?}", SegmentTag::PANOSE), "PA");
        assert_eq!(format!("{:?}", SegmentTag::NULL), "NULL");
        assert_eq!(format!("{:?}", SegmentTag([0, 1])), "0x0001");
    }

    #[test]
    fn test_segment_framing() {
        let seg = Segment::new(SegmentTag::COPYRIGHT, copyright_data("(c)"));
        assert_eq!(seg.encoded_len(SizeField::Short), 8);
        assert_eq!(seg.encoded_len(SizeField::Long), 10);

        let mut out = ByteWriter::new(Vec::new());
        seg.write(&mut out, SizeField::Short).unwrap();
        Segment::null().write(&mut out, SizeField::Long).unwrap();
        assert_eq!(
            out.into_inner(),
            b"CP\x00\x04(c)\x00\xFF\xFF\x00\x00\x00\x00".to_vec()
        );
    }

    #[test]
    fn test_symbol_map_data() {
        let map = SymbolSetMap::single_range(0x41, vec![0x0041, 0x00C4]).unwrap();
        assert_eq!(
            symbol_map_data(&map),
            vec![0x00, 0x41, 0x00, 0x42, 0x00, 0x41, 0x00, 0xC4]
        );
    }
}
