//! The format independent part of font generation

use std::{borrow::Cow, collections::HashSet, io::Write};

use log::{debug, error, info, warn};

use super::{
    component_ids,
    segment::{self, Segment, SegmentTag},
    BasicMetrics, Diagnostic, EmittedGlyph, FontError, FontMetadata, GenerateOptions, GlyphRecord,
    GlyphSource, GenerationReport, VerticalMetrics, NO_CHAR_CODE,
};
use crate::{
    symset::{SymbolSetMap, NOT_MAPPED},
    util::ByteWriter,
};

/// Everything a framing needs to write the font header
#[derive(Debug)]
pub struct FontHeader<'a> {
    /// Descriptive fields
    pub meta: &'a FontMetadata,
    /// Values from the glyph source
    pub metrics: BasicMetrics,
    /// All segments, terminated by the `NULL` segment
    pub segments: Vec<Segment<'a>>,
    /// Characters are addressed by code point
    pub unbound: bool,
    /// Vertical metrics are present and requested
    pub vertical: bool,
}

/// The way a font is framed in the output stream
pub trait FontFraming {
    /// Write the complete font header, returning its length
    fn write_header<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        header: &FontHeader<'_>,
    ) -> Result<u64, FontError>;

    /// Write whatever precedes the first character
    fn begin_characters<W: Write>(&mut self, _out: &mut ByteWriter<W>) -> Result<(), FontError> {
        Ok(())
    }

    /// Write one character record
    fn write_char<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        char_code: u16,
        glyph: &GlyphRecord,
        outline: &[u8],
    ) -> Result<(), FontError>;

    /// Write whatever follows the last character
    fn end_characters<W: Write>(&mut self, _out: &mut ByteWriter<W>) -> Result<(), FontError> {
        Ok(())
    }
}

fn header_segments<'a, S: GlyphSource + ?Sized>(
    source: &'a S,
    meta: &'a FontMetadata,
    metrics: &BasicMetrics,
    map: Option<&SymbolSetMap>,
    embed_map: bool,
    vertical: Option<VerticalMetrics>,
) -> Vec<Segment<'a>> {
    let unbound = !meta.symbol_set_type.is_bound();
    let mut segments = Vec::with_capacity(8);

    let panose = meta.panose.unwrap_or_default();
    segments.push(Segment::new(SegmentTag::PANOSE, panose.to_vec()));
    if !meta.copyright.is_empty() {
        segments.push(Segment::new(
            SegmentTag::COPYRIGHT,
            segment::copyright_data(&meta.copyright),
        ));
    }
    if let Some(map) = map.filter(|_| embed_map && !unbound) {
        segments.push(Segment::new(
            SegmentTag::SYMBOL_MAP,
            segment::symbol_map_data(map),
        ));
    }
    if let Some(vertical) = vertical {
        segments.push(Segment::new(
            SegmentTag::VERTICAL,
            segment::vertical_data(vertical.descender),
        ));
    }
    if metrics.glyph_zero_exists {
        segments.push(Segment::new(SegmentTag::GALLEY, &segment::GALLEY_DATA[..]));
    }
    if unbound {
        let complement = meta
            .char_complement
            .unwrap_or(segment::DEFAULT_COMPLEMENT);
        segments.push(Segment::new(SegmentTag::COMPLEMENT, complement.to_vec()));
    }
    if let Some(data) = source.global_data() {
        segments.push(Segment::new(SegmentTag::GLOBAL_TRUETYPE, data));
    }
    segments.push(Segment::null());
    segments
}

/// Writes a font from a glyph source with some framing
///
/// The encoder keeps track of the glyphs written during one run, so that
/// components shared by several composite glyphs are only written once.
pub struct FontEncoder<'s, S: ?Sized, F> {
    source: &'s S,
    framing: F,
    metrics: BasicMetrics,
    vertical_metrics: bool,
    embed_symbol_set_map: bool,
    max_depth: u16,
    visited: HashSet<u16>,
    report: GenerationReport,
}

impl<'s, S: GlyphSource + ?Sized, F: FontFraming> FontEncoder<'s, S, F> {
    /// Create a new encoder
    pub fn new(source: &'s S, framing: F, options: &GenerateOptions) -> Self {
        Self {
            source,
            framing,
            metrics: source.basic_metrics(),
            vertical_metrics: options.vertical_metrics,
            embed_symbol_set_map: options.embed_symbol_set_map,
            max_depth: options.max_component_depth,
            visited: HashSet::new(),
            report: GenerationReport::default(),
        }
    }

    /// The framing strategy
    pub fn framing(&self) -> &F {
        &self.framing
    }

    /// The report of the current run
    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    /// Finish the run and get its report
    pub fn finish(self) -> GenerationReport {
        self.report
    }

    /// Write the header and all characters
    pub fn write_font<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        meta: &FontMetadata,
        map: Option<&SymbolSetMap>,
        code_range_size: u32,
    ) -> Result<(), FontError> {
        self.visited.clear();
        self.report = GenerationReport::default();
        self.write_header(out, meta, map)?;
        self.write_character_set(out, code_range_size, !meta.symbol_set_type.is_bound())
    }

    /// Write the font header
    pub fn write_header<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        meta: &FontMetadata,
        map: Option<&SymbolSetMap>,
    ) -> Result<u64, FontError> {
        let metrics = self.metrics;
        if metrics.first_code > metrics.last_code {
            return Err(FontError::InvalidMetadata(format!(
                "first code 0x{:04X} is after last code 0x{:04X}",
                metrics.first_code, metrics.last_code
            )));
        }
        let source = self.source;
        let vertical = source
            .vertical_metrics()
            .filter(|_| self.vertical_metrics);
        let segments = header_segments(
            source,
            meta,
            &metrics,
            map,
            self.embed_symbol_set_map,
            vertical,
        );
        for segment in &segments {
            debug!("Segment {:?}: {} bytes", segment.tag, segment.data.len());
        }
        let header = FontHeader {
            meta,
            metrics,
            segments,
            unbound: !meta.symbol_set_type.is_bound(),
            vertical: vertical.is_some(),
        };
        let length = self.framing.write_header(out, &header)?;
        info!(
            "Font header for '{}': {} bytes, {} segments",
            meta.font_name,
            length,
            header.segments.len()
        );
        self.report.header_length = length;
        Ok(length)
    }

    /// Write the galley character and all characters of the symbol set
    ///
    /// Character codes `0..code_range_size` are checked. For unbound fonts,
    /// the code point of a character is used as its character code.
    pub fn write_character_set<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        code_range_size: u32,
        unbound: bool,
    ) -> Result<(), FontError> {
        self.framing.begin_characters(out)?;
        if self.metrics.glyph_zero_exists {
            self.write_char(out, NO_CHAR_CODE, 0, 0, 0)?;
        }
        if let Some(last) = code_range_size.checked_sub(1) {
            let last = u16::try_from(last).unwrap_or(u16::MAX);
            for code in 0..=last {
                let data = self.source.char_data(code);
                if data.exists {
                    let char_code = if unbound { data.codepoint } else { code };
                    self.write_char(out, char_code, data.codepoint, data.glyph_id, 0)?;
                } else if !unbound && data.codepoint != NOT_MAPPED {
                    warn!(
                        "Missing character 0x{:04X} (U+{:04X})",
                        code, data.codepoint
                    );
                    self.report.diagnostics.push(Diagnostic::MissingCharacter {
                        code,
                        codepoint: data.codepoint,
                    });
                }
            }
        }
        self.framing.end_characters(out)
    }

    /// Write a character record and expand composite glyphs
    pub fn write_char<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        char_code: u16,
        codepoint: u16,
        glyph_id: u16,
        depth: u16,
    ) -> Result<(), FontError> {
        if depth > self.max_depth {
            return Err(FontError::CompositeTooDeep {
                glyph: glyph_id,
                depth,
                limit: self.max_depth,
            });
        }
        self.visited.insert(glyph_id);

        let source = self.source;
        let glyph = source.glyph_data(glyph_id)?;
        debug!(
            "Char 0x{:04X} (U+{:04X}) glyph {}: advance {}, lsb {}, {} bytes at {}{}",
            char_code,
            codepoint,
            glyph_id,
            glyph.advance_width,
            glyph.left_side_bearing,
            glyph.outline_length,
            glyph.outline_offset,
            if glyph.is_composite { ", composite" } else { "" }
        );
        let outline = match glyph.outline_length {
            0 => Cow::Borrowed(&[][..]),
            length => source.read_bytes(glyph.outline_offset, length)?,
        };
        self.framing.write_char(out, char_code, &glyph, &outline)?;
        self.report.records.push(EmittedGlyph {
            char_code,
            codepoint,
            glyph_id,
            depth,
        });

        if glyph.is_composite {
            let (components, truncated) = component_ids(&outline);
            if truncated {
                warn!("Composite glyph {} has truncated component data", glyph_id);
            }
            for component in components {
                if component > self.metrics.max_glyph_id {
                    error!(
                        "Composite glyph {} references glyph {}, maximum is {}",
                        glyph_id, component, self.metrics.max_glyph_id
                    );
                    self.report
                        .diagnostics
                        .push(Diagnostic::InvalidComponentGlyph {
                            parent: glyph_id,
                            component,
                            max: self.metrics.max_glyph_id,
                        });
                } else if self.visited.contains(&component) {
                    info!(
                        "Composite glyph {} reuses glyph {}, not written again",
                        glyph_id, component
                    );
                    self.report.diagnostics.push(Diagnostic::ReusedGlyph {
                        parent: glyph_id,
                        glyph: component,
                    });
                } else {
                    self.write_char(out, NO_CHAR_CODE, 0, component, depth.saturating_add(1))?;
                }
            }
        }
        Ok(())
    }
}
