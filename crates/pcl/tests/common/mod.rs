#![allow(dead_code)]

use std::{borrow::Cow, collections::BTreeMap};

use pcl::font::{
    BasicMetrics, CharData, GlyphRecord, GlyphSource, GlyphSourceError, VerticalMetrics,
};

const MORE_COMPONENTS: u16 = 0x0020;
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;

/// An in-memory font with simple and composite glyphs
pub struct MockFont {
    glyphs: Vec<GlyphRecord>,
    data: Vec<u8>,
    chars: BTreeMap<u16, u16>,
    unmapped: Vec<u16>,
    global: Option<Vec<u8>>,
    vertical: Option<VerticalMetrics>,
}

impl MockFont {
    pub fn new() -> Self {
        Self {
            glyphs: Vec::new(),
            data: Vec::new(),
            chars: BTreeMap::new(),
            unmapped: Vec::new(),
            global: None,
            vertical: None,
        }
    }

    /// Four simple glyphs: notdef and the glyphs for `A`, `B` and `C`
    pub fn abc() -> Self {
        let mut font = Self::new();
        font.simple(&[0x00, 0x01, 0x02, 0x03]);
        font.simple(&[0x41; 12]);
        font.simple(&[0x42; 14]);
        font.simple(&[0x43; 16]);
        font.map(0x41, 1).map(0x42, 2).map(0x43, 3);
        font
    }

    fn push(&mut self, outline: &[u8], is_composite: bool) -> u16 {
        let glyph_id = self.glyphs.len() as u16;
        self.glyphs.push(GlyphRecord {
            glyph_id,
            advance_width: 500 + glyph_id,
            height: 1000,
            left_side_bearing: 10,
            top_side_bearing: 20,
            outline_offset: self.data.len() as u32,
            outline_length: outline.len() as u32,
            is_composite,
        });
        self.data.extend_from_slice(outline);
        glyph_id
    }

    pub fn simple(&mut self, outline: &[u8]) -> u16 {
        self.push(outline, false)
    }

    pub fn composite(&mut self, components: &[u16]) -> u16 {
        let mut outline = vec![0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0];
        for (index, component) in components.iter().enumerate() {
            let mut flags = ARG_1_AND_2_ARE_WORDS;
            if index + 1 < components.len() {
                flags |= MORE_COMPONENTS;
            }
            outline.extend_from_slice(&flags.to_be_bytes());
            outline.extend_from_slice(&component.to_be_bytes());
            outline.extend_from_slice(&[0, 0, 0, 0]);
        }
        self.push(&outline, true)
    }

    pub fn map(&mut self, code: u16, glyph_id: u16) -> &mut Self {
        self.chars.insert(code, glyph_id);
        self
    }

    pub fn unmap(&mut self, code: u16) -> &mut Self {
        self.unmapped.push(code);
        self
    }

    pub fn with_global(&mut self, data: Vec<u8>) -> &mut Self {
        self.global = Some(data);
        self
    }

    pub fn with_vertical(&mut self, descender: i16) -> &mut Self {
        self.vertical = Some(VerticalMetrics { descender });
        self
    }
}

impl GlyphSource for MockFont {
    fn basic_metrics(&self) -> BasicMetrics {
        BasicMetrics {
            num_chars: self.chars.len() as u16,
            first_code: self.chars.keys().next().copied().unwrap_or(0),
            last_code: self.chars.keys().last().copied().unwrap_or(0),
            max_glyph_id: self.glyphs.len().saturating_sub(1) as u16,
            max_component_depth: 1,
            units_per_em: 2048,
            glyph_zero_exists: !self.glyphs.is_empty(),
        }
    }

    fn glyph_data(&self, glyph_id: u16) -> Result<GlyphRecord, GlyphSourceError> {
        self.glyphs
            .get(usize::from(glyph_id))
            .copied()
            .ok_or(GlyphSourceError::GlyphOutOfRange {
                glyph: glyph_id,
                max: self.glyphs.len() as u16,
            })
    }

    fn char_data(&self, code: u16) -> CharData {
        if self.unmapped.contains(&code) {
            return CharData {
                exists: false,
                codepoint: 0xFFFF,
                glyph_id: 0,
            };
        }
        match self.chars.get(&code) {
            Some(&glyph_id) => CharData {
                exists: true,
                codepoint: code,
                glyph_id,
            },
            None => CharData {
                exists: false,
                codepoint: code,
                glyph_id: 0,
            },
        }
    }

    fn read_bytes(&self, offset: u32, length: u32) -> Result<Cow<'_, [u8]>, GlyphSourceError> {
        let start = offset as usize;
        let end = start + length as usize;
        self.data
            .get(start..end)
            .map(Cow::Borrowed)
            .ok_or(GlyphSourceError::OutOfBounds {
                offset,
                length,
                size: self.data.len(),
            })
    }

    fn vertical_metrics(&self) -> Option<VerticalMetrics> {
        self.vertical
    }

    fn global_data(&self) -> Option<Cow<'_, [u8]>> {
        self.global.as_deref().map(Cow::Borrowed)
    }
}

/// A parameterized escape sequence and its value
fn escape(bytes: &[u8], pos: usize) -> (&[u8], u64, usize) {
    assert_eq!(bytes[pos], 0x1B, "no escape at {}", pos);
    let intro = &bytes[pos + 1..pos + 3];
    let mut value = 0;
    let mut i = pos + 3;
    while bytes[i].is_ascii_digit() {
        value = value * 10 + u64::from(bytes[i] - b'0');
        i += 1;
    }
    (intro, value, i + 1)
}

/// A PCL soft font split into its parts
pub struct ParsedFont<'a> {
    pub header: &'a [u8],
    /// Character code and data after `ESC ( s # W`
    pub chars: Vec<(u16, &'a [u8])>,
}

pub fn split_pcl_font(bytes: &[u8]) -> ParsedFont<'_> {
    let (intro, length, pos) = escape(bytes, 0);
    assert_eq!(intro, b")s");
    let end = pos + length as usize;
    let header = &bytes[pos..end];

    let mut chars = Vec::new();
    let mut pos = end;
    while pos < bytes.len() {
        let (intro, code, next) = escape(bytes, pos);
        assert_eq!(intro, b"*c");
        let (intro, size, next) = escape(bytes, next);
        assert_eq!(intro, b"(s");
        let end = next + size as usize;
        chars.push((code as u16, &bytes[next..end]));
        pos = end;
    }
    ParsedFont { header, chars }
}

pub fn byte_sum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}
