use std::borrow::Cow;

use log::{debug, info, warn};
use pcl::{
    font::{BasicMetrics, CharData, GlyphRecord, GlyphSource, GlyphSourceError, VerticalMetrics},
    symset::{MapVariant, SymbolSetMap, NOT_MAPPED},
};
use ttf_parser::{Face, GlyphId, Tag};

use crate::sfnt::SfntBuilder;

/// Offset of `indexToLocFormat` in the `head` table
const HEAD_LOC_FORMAT: usize = 50;

/// Offset of `maxComponentDepth` in a version 1.0 `maxp` table
const MAXP_COMPONENT_DEPTH: usize = 30;

/// Tables copied into the global TrueType data, if present
const GLOBAL_TABLES: [&[u8; 4]; 7] = [
    b"head", b"hhea", b"hmtx", b"maxp", b"cvt ", b"fpgm", b"prep",
];

pub(crate) fn raw_table<'a>(face: &Face<'a>, tag: &[u8; 4]) -> Option<&'a [u8]> {
    face.raw_face().table(Tag::from_bytes(tag))
}

fn be_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn be_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Parse the `loca` table into `num_glyphs + 1` offsets into `glyf`
fn glyph_offsets(
    loca: &[u8],
    long: bool,
    num_glyphs: u16,
) -> Result<Vec<u32>, GlyphSourceError> {
    let count = usize::from(num_glyphs) + 1;
    let offsets: Option<Vec<u32>> = if long {
        (0..count).map(|i| be_u32(loca, i * 4)).collect()
    } else {
        (0..count)
            .map(|i| be_u16(loca, i * 2).map(|v| u32::from(v) * 2))
            .collect()
    };
    offsets.ok_or_else(|| {
        GlyphSourceError::Malformed(format!(
            "loca has {} bytes, too short for {} glyphs",
            loca.len(),
            num_glyphs
        ))
    })
}

/// Build the payload of the `GT` segment
///
/// This is an `sfnt` with the tables the printer needs for hinting and
/// metrics, plus the empty `gdir` table that stands in for `glyf`.
pub fn global_truetype_data(face: &Face<'_>) -> Vec<u8> {
    let mut sfnt = SfntBuilder::new();
    for tag in GLOBAL_TABLES {
        if let Some(data) = raw_table(face, tag) {
            sfnt.add_table(tag, data.to_vec());
        }
    }
    sfnt.add_table(b"gdir", Vec::new());
    sfnt.build()
}

/// How character codes are mapped to Unicode code points
#[derive(Debug, Clone, Copy)]
pub enum CharMapping<'m> {
    /// Codes of a bound symbol set
    Bound(&'m SymbolSetMap, MapVariant),
    /// Codes are Unicode code points
    Unbound,
}

impl CharMapping<'_> {
    fn codepoint(&self, code: u16) -> u16 {
        match self {
            Self::Bound(map, variant) => map.lookup(code, *variant),
            Self::Unbound => code,
        }
    }

    fn codes(&self) -> std::ops::RangeInclusive<u16> {
        match self {
            Self::Bound(map, _) => map.code_min()..=map.code_max(),
            Self::Unbound => 0..=u16::MAX,
        }
    }
}

/// A TrueType font as a [`GlyphSource`]
pub struct TrueTypeSource<'a, 'm> {
    face: Face<'a>,
    glyf: &'a [u8],
    offsets: Vec<u32>,
    mapping: CharMapping<'m>,
    metrics: BasicMetrics,
    global: Vec<u8>,
}

impl<'a, 'm> TrueTypeSource<'a, 'm> {
    /// Parse a font (`index` selects a font in a collection)
    pub fn new(
        data: &'a [u8],
        index: u32,
        mapping: CharMapping<'m>,
    ) -> Result<Self, GlyphSourceError> {
        let face = Face::parse(data, index)
            .map_err(|e| GlyphSourceError::Malformed(e.to_string()))?;
        Self::from_face(face, mapping)
    }

    /// Use a parsed font
    pub fn from_face(face: Face<'a>, mapping: CharMapping<'m>) -> Result<Self, GlyphSourceError> {
        let head = raw_table(&face, b"head").ok_or(GlyphSourceError::MissingTable("head"))?;
        let loca = raw_table(&face, b"loca").ok_or(GlyphSourceError::MissingTable("loca"))?;
        let glyf = raw_table(&face, b"glyf").ok_or(GlyphSourceError::MissingTable("glyf"))?;
        let loc_format = be_u16(head, HEAD_LOC_FORMAT)
            .ok_or_else(|| GlyphSourceError::Malformed(String::from("head table too short")))?;
        let long = loc_format != 0;

        let num_glyphs = face.number_of_glyphs();
        let offsets = glyph_offsets(loca, long, num_glyphs)?;
        let max_component_depth = raw_table(&face, b"maxp")
            .and_then(|maxp| be_u16(maxp, MAXP_COMPONENT_DEPTH))
            .unwrap_or(0);

        let mut metrics = BasicMetrics {
            max_glyph_id: num_glyphs.saturating_sub(1),
            max_component_depth,
            units_per_em: face.units_per_em(),
            glyph_zero_exists: num_glyphs > 0,
            ..BasicMetrics::default()
        };
        let mut codes = mapping
            .codes()
            .filter(|&code| lookup(&face, mapping.codepoint(code)).is_some());
        if let Some(first) = codes.next() {
            let (last, count) = codes.fold((first, 1u32), |(_, n), code| (code, n + 1));
            metrics.first_code = first;
            metrics.last_code = last;
            metrics.num_chars = u16::try_from(count).unwrap_or(u16::MAX);
        }
        info!(
            "TrueType font: {} glyphs, {} characters in 0x{:04X}..=0x{:04X}, {} units per em",
            num_glyphs, metrics.num_chars, metrics.first_code, metrics.last_code, metrics.units_per_em
        );

        let global = global_truetype_data(&face);
        debug!("Global TrueType data: {} bytes", global.len());
        Ok(Self {
            face,
            glyf,
            offsets,
            mapping,
            metrics,
            global,
        })
    }

    /// The parsed font
    pub fn face(&self) -> &Face<'a> {
        &self.face
    }
}

/// Distance from descender to ascender, 0 if the font has them swapped
fn em_height(ascender: i16, descender: i16) -> u16 {
    let height = i32::from(ascender) - i32::from(descender);
    u16::try_from(height).unwrap_or_else(|_| {
        warn!("Descender {} is above ascender {}", descender, ascender);
        0
    })
}

fn lookup(face: &Face<'_>, codepoint: u16) -> Option<GlyphId> {
    if codepoint == NOT_MAPPED {
        return None;
    }
    char::from_u32(codepoint.into()).and_then(|c| face.glyph_index(c))
}

impl GlyphSource for TrueTypeSource<'_, '_> {
    fn basic_metrics(&self) -> BasicMetrics {
        self.metrics
    }

    fn glyph_data(&self, glyph_id: u16) -> Result<GlyphRecord, GlyphSourceError> {
        let index = usize::from(glyph_id);
        let (start, end) = match (self.offsets.get(index), self.offsets.get(index + 1)) {
            (Some(&start), Some(&end)) if glyph_id <= self.metrics.max_glyph_id => (start, end),
            _ => {
                return Err(GlyphSourceError::GlyphOutOfRange {
                    glyph: glyph_id,
                    max: self.metrics.max_glyph_id,
                })
            }
        };
        let outline_length = end.saturating_sub(start);
        let is_composite = outline_length >= 2
            && be_u16(self.glyf, start as usize).map_or(false, |contours| (contours as i16) < 0);

        let id = GlyphId(glyph_id);
        let face = &self.face;
        let height = face
            .glyph_ver_advance(id)
            .unwrap_or_else(|| em_height(face.ascender(), face.descender()));
        Ok(GlyphRecord {
            glyph_id,
            advance_width: face.glyph_hor_advance(id).unwrap_or(0),
            height,
            left_side_bearing: face.glyph_hor_side_bearing(id).unwrap_or(0),
            top_side_bearing: face.glyph_ver_side_bearing(id).unwrap_or(0),
            outline_offset: start,
            outline_length,
            is_composite,
        })
    }

    fn char_data(&self, code: u16) -> CharData {
        let codepoint = self.mapping.codepoint(code);
        match lookup(&self.face, codepoint) {
            Some(glyph) => CharData {
                exists: true,
                codepoint,
                glyph_id: glyph.0,
            },
            None => CharData {
                exists: false,
                codepoint,
                glyph_id: 0,
            },
        }
    }

    fn read_bytes(&self, offset: u32, length: u32) -> Result<Cow<'_, [u8]>, GlyphSourceError> {
        let start = offset as usize;
        let end = start.saturating_add(length as usize);
        self.glyf
            .get(start..end)
            .map(Cow::Borrowed)
            .ok_or(GlyphSourceError::OutOfBounds {
                offset,
                length,
                size: self.glyf.len(),
            })
    }

    fn vertical_metrics(&self) -> Option<VerticalMetrics> {
        let vhea = self.face.tables().vhea?;
        raw_table(&self.face, b"vmtx")?;
        Some(VerticalMetrics {
            descender: vhea.descender,
        })
    }

    fn global_data(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(&self.global))
    }
}
