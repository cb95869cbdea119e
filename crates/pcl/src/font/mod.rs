//! # TrueType soft fonts
//!
//! This module writes scalable TrueType fonts in the two download formats
//! understood by HP printers:
//!
//! - PCL: a font header (`ESC ) s # W`) with a 72 byte descriptor, followed by
//!   one character record (`ESC * c # E` + `ESC ( s # W`) per character code
//! - PCL XL: a `BeginFontHeader`/`ReadFontHeader`/`EndFontHeader` operator
//!   sequence, followed by `ReadChar` blocks enclosed in `BeginChar`/`EndChar`
//!
//! The glyph data comes from a [`GlyphSource`]. Both formats share the glyph
//! resolution and composite expansion of the [`FontEncoder`] and only differ
//! in their [`FontFraming`].

use std::{borrow::Cow, fs, io::Write, path::Path};

use log::{info, warn};
use serde::{Deserialize, Serialize};

mod composite;
mod encoder;
mod error;
mod pcl;
mod pclxl;
mod segment;

pub use composite::{component_ids, Component, ComponentFlags, ComponentIter};
pub use encoder::{FontEncoder, FontFraming, FontHeader};
pub use error::{Diagnostic, FontError, GlyphSourceError};
pub use pcl::{HeaderFormat, PclFraming, DESCRIPTOR_SIZE};
pub use pclxl::{CharClass, PclXlFraming};
pub use segment::{Segment, SegmentTag, SizeField};

use crate::{
    symset::{SymbolSetId, SymbolSetMap, SymbolSetType},
    util::{create_output, ByteWriter},
};

/// Character code used for characters without a code of their own
///
/// This is used for the galley character and for glyphs that are only
/// referenced as components of composite glyphs.
pub const NO_CHAR_CODE: u16 = 0xFFFF;

/// Font-wide values reported by a glyph source
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BasicMetrics {
    /// Number of characters in the font
    pub num_chars: u16,
    /// First character code
    pub first_code: u16,
    /// Last character code
    pub last_code: u16,
    /// Highest glyph id
    pub max_glyph_id: u16,
    /// Maximum nesting of composite glyphs
    pub max_component_depth: u16,
    /// Design units per em
    pub units_per_em: u16,
    /// Whether there is a glyph 0
    pub glyph_zero_exists: bool,
}

/// Metrics and location of the outline of a glyph
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct GlyphRecord {
    /// The glyph id
    pub glyph_id: u16,
    /// Horizontal advance
    pub advance_width: u16,
    /// Vertical advance
    pub height: u16,
    /// Left side bearing
    pub left_side_bearing: i16,
    /// Top side bearing
    pub top_side_bearing: i16,
    /// Offset of the outline in the glyph data
    pub outline_offset: u32,
    /// Length of the outline
    pub outline_length: u32,
    /// Whether the outline is made of component references
    pub is_composite: bool,
}

/// The glyph for a character code
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CharData {
    /// Whether the font has a glyph for the code
    pub exists: bool,
    /// The target code point, `0xFFFF` if the code is not mapped
    pub codepoint: u16,
    /// The glyph id
    pub glyph_id: u16,
}

/// Font-wide vertical metrics
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct VerticalMetrics {
    /// Distance from the baseline to the bottom of the em box
    pub descender: i16,
}

/// Provider of the glyphs of a font
pub trait GlyphSource {
    /// Font-wide values
    fn basic_metrics(&self) -> BasicMetrics;

    /// Metrics and outline location of a glyph
    fn glyph_data(&self, glyph_id: u16) -> Result<GlyphRecord, GlyphSourceError>;

    /// The glyph for a character code of the target symbol set
    fn char_data(&self, code: u16) -> CharData;

    /// Raw glyph data
    fn read_bytes(&self, offset: u32, length: u32) -> Result<Cow<'_, [u8]>, GlyphSourceError>;

    /// Vertical metrics, if the font has any
    fn vertical_metrics(&self) -> Option<VerticalMetrics> {
        None
    }

    /// Payload of the global TrueType data segment
    fn global_data(&self) -> Option<Cow<'_, [u8]>> {
        None
    }
}

/// Horizontal spacing of a font
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Spacing {
    /// All glyphs have the same advance
    Fixed,
    /// Glyphs have individual advances
    #[default]
    Proportional,
}

/// Descriptive header fields of a font
///
/// Metrics are in design units unless noted otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FontMetadata {
    /// Name, at most 16 characters are used
    pub font_name: String,
    /// Copyright or conversion notice
    pub copyright: String,
    /// Typeface family id
    pub typeface: u16,
    /// Style word (posture, width and structure)
    pub style: u16,
    /// Stroke weight, `-7..=7`
    pub stroke_weight: i8,
    /// Width type, `-5..=5`
    pub width_type: i8,
    /// Serif style
    pub serif_style: u8,
    /// Fixed or proportional
    pub spacing: Spacing,
    /// Orientation (0 = portrait)
    pub orientation: u8,
    /// The symbol set the font is bound to
    pub symbol_set: SymbolSetId,
    /// The addressing scheme of the symbol set
    pub symbol_set_type: SymbolSetType,
    /// Font number
    pub font_number: u32,
    /// Quality (0 = data processing)
    pub quality: u8,
    /// Placement (0 = normal)
    pub placement: i8,
    /// Variety byte of the descriptor
    pub variety: u8,
    /// PANOSE classification
    pub panose: Option<[u8; 10]>,
    /// Character complement for unbound fonts
    pub char_complement: Option<[u8; 8]>,
    /// Top of the em box above the baseline
    pub ascender: i16,
    /// Bottom of the em box, usually negative
    pub descender: i16,
    /// Maximum horizontal extent
    pub cell_width: u16,
    /// Height of lower case letters
    pub x_height: u16,
    /// Height of capital letters
    pub cap_height: u16,
    /// Advance width of the space character
    pub space_width: u16,
    /// Average advance width
    pub average_width: u16,
    /// Position of the underline
    pub underline_position: i16,
    /// Thickness of the underline
    pub underline_thickness: u16,
}

impl Default for FontMetadata {
    fn default() -> Self {
        Self {
            font_name: String::from("PCL Soft Font"),
            copyright: String::new(),
            typeface: 0,
            style: 0,
            stroke_weight: 0,
            width_type: 0,
            serif_style: 0,
            spacing: Spacing::Proportional,
            orientation: 0,
            symbol_set: SymbolSetId::ROMAN_8,
            symbol_set_type: SymbolSetType::BoundPc8,
            font_number: 0,
            quality: 0,
            placement: 0,
            variety: 0,
            panose: None,
            char_complement: None,
            ascender: 0,
            descender: 0,
            cell_width: 0,
            x_height: 0,
            cap_height: 0,
            space_width: 0,
            average_width: 0,
            underline_position: 0,
            underline_thickness: 0,
        }
    }
}

impl FontMetadata {
    /// The 16 byte name field, padded with spaces
    pub fn name_bytes(&self) -> [u8; 16] {
        let mut name = [b' '; 16];
        for (slot, c) in name.iter_mut().zip(self.font_name.chars()) {
            *slot = if c.is_ascii_graphic() || c == ' ' {
                c as u8
            } else {
                b'?'
            };
        }
        name
    }

    /// The symbol set id written into the header
    pub fn header_symbol_set(&self) -> SymbolSetId {
        if self.symbol_set_type.is_bound() {
            self.symbol_set
        } else {
            SymbolSetId::UNBOUND
        }
    }

    /// Default horizontal motion in design units
    ///
    /// This is the advance of the space character, or the average width for
    /// fonts without a space. It is 0 if both are unknown.
    pub fn pitch(&self) -> u16 {
        if self.space_width > 0 {
            self.space_width
        } else {
            self.average_width
        }
    }

    /// Pitch in characters per inch at the given point size
    ///
    /// Returns 0 if the pitch, the design units or the size is 0.
    pub fn characters_per_inch(&self, units_per_em: u16, point_size: f64) -> f64 {
        let divisor = f64::from(self.pitch()) * point_size;
        if divisor <= 0.0 || units_per_em == 0 {
            0.0
        } else {
            72.0 * f64::from(units_per_em) / divisor
        }
    }
}

/// Changes to the metadata from the configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataOverrides {
    /// Replace the font name
    pub font_name: Option<String>,
    /// Replace the typeface id
    pub typeface: Option<u16>,
    /// Replace the style word
    pub style: Option<u16>,
    /// Replace the stroke weight
    pub stroke_weight: Option<i8>,
    /// Replace the font number
    pub font_number: Option<u32>,
    /// Replace the copyright notice
    pub copyright: Option<String>,
}

impl MetadataOverrides {
    /// Apply all present values
    pub fn apply(&self, meta: &mut FontMetadata) {
        if let Some(name) = &self.font_name {
            meta.font_name.clone_from(name);
        }
        if let Some(typeface) = self.typeface {
            meta.typeface = typeface;
        }
        if let Some(style) = self.style {
            meta.style = style;
        }
        if let Some(weight) = self.stroke_weight {
            meta.stroke_weight = weight;
        }
        if let Some(number) = self.font_number {
            meta.font_number = number;
        }
        if let Some(copyright) = &self.copyright {
            meta.copyright.clone_from(copyright);
        }
    }
}

/// Options for font generation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Use the Format 16 header even for bound fonts
    pub format16: bool,
    /// Write vertical metrics if the source has them
    pub vertical_metrics: bool,
    /// Write the `SM` segment with the symbol set mapping
    pub embed_symbol_set_map: bool,
    /// Start PCL XL output with a stream header carrying this comment
    pub xl_stream_header: Option<String>,
    /// Maximum nesting of composite glyphs
    pub max_component_depth: u16,
    /// Number of character codes to check, derived from the symbol set type if unset
    pub code_range_size: Option<u32>,
    /// Changes to the font metadata
    pub overrides: MetadataOverrides,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            format16: false,
            vertical_metrics: false,
            embed_symbol_set_map: false,
            xl_stream_header: None,
            max_component_depth: 16,
            code_range_size: None,
            overrides: MetadataOverrides::default(),
        }
    }
}

/// A character record that was written
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EmittedGlyph {
    /// The character code, [`NO_CHAR_CODE`] for components and the galley character
    pub char_code: u16,
    /// The target code point, 0 for components
    pub codepoint: u16,
    /// The glyph id
    pub glyph_id: u16,
    /// Nesting depth, 0 for top level characters
    pub depth: u16,
}

/// Outcome of a font generation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Number of bytes in the font header
    pub header_length: u64,
    /// All character records in output order
    pub records: Vec<EmittedGlyph>,
    /// Non-fatal problems
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    /// Records for character codes of the symbol set
    pub fn top_level(&self) -> impl Iterator<Item = &EmittedGlyph> {
        self.records
            .iter()
            .filter(|r| r.depth == 0 && r.char_code != NO_CHAR_CODE)
    }

    /// Number of [`Diagnostic::MissingCharacter`] entries
    pub fn missing_characters(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::MissingCharacter { .. }))
            .count()
    }
}

/// The target format of a font file
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum OutputFormat {
    /// PCL 5 escape sequences
    Pcl,
    /// PCL XL operators
    PclXl,
}

fn code_range_size(meta: &FontMetadata, options: &GenerateOptions) -> u32 {
    options
        .code_range_size
        .unwrap_or_else(|| meta.symbol_set_type.code_range_size())
        .min(0x10000)
}

/// Write a PCL soft font
pub fn write_pcl_font<S: GlyphSource + ?Sized, W: Write>(
    source: &S,
    out: &mut ByteWriter<W>,
    meta: &FontMetadata,
    map: Option<&SymbolSetMap>,
    options: &GenerateOptions,
) -> Result<GenerationReport, FontError> {
    let format = if options.format16 || !meta.symbol_set_type.is_bound() {
        HeaderFormat::Format16
    } else {
        HeaderFormat::Format15
    };
    let mut encoder = FontEncoder::new(source, PclFraming::new(format), options);
    encoder.write_font(out, meta, map, code_range_size(meta, options))?;
    Ok(encoder.finish())
}

/// Write a PCL XL soft font
pub fn write_pclxl_font<S: GlyphSource + ?Sized, W: Write>(
    source: &S,
    out: &mut ByteWriter<W>,
    meta: &FontMetadata,
    map: Option<&SymbolSetMap>,
    options: &GenerateOptions,
) -> Result<GenerationReport, FontError> {
    let framing = PclXlFraming::new(meta.name_bytes(), options.xl_stream_header.clone());
    let mut encoder = FontEncoder::new(source, framing, options);
    encoder.write_font(out, meta, map, code_range_size(meta, options))?;
    Ok(encoder.finish())
}

/// Whether an incomplete output at `path` may be deleted
///
/// Only regular files are removed, and only if the path was free or already
/// held a regular file before the output was created.
fn is_removable(path: &Path, before: Option<&fs::Metadata>) -> bool {
    let was_file = before.map_or(true, |meta| meta.file_type().is_file());
    let is_file = fs::symlink_metadata(path).map_or(false, |meta| meta.file_type().is_file());
    was_file && is_file
}

/// Create a font file
///
/// An incomplete file is removed if generation fails, unless the path named
/// something other than a regular file.
pub fn generate_font_file<S: GlyphSource + ?Sized>(
    source: &S,
    path: &Path,
    format: OutputFormat,
    meta: &FontMetadata,
    map: Option<&SymbolSetMap>,
    options: &GenerateOptions,
) -> Result<GenerationReport, FontError> {
    let before = fs::symlink_metadata(path).ok();
    let mut out = create_output(path).map_err(FontError::file(path))?;
    let written = match format {
        OutputFormat::Pcl => write_pcl_font(source, &mut out, meta, map, options),
        OutputFormat::PclXl => write_pclxl_font(source, &mut out, meta, map, options),
    };
    let result = written
        .and_then(|report| {
            out.finish()?;
            Ok(report)
        })
        .map_err(|e| e.with_path(path));
    match &result {
        Ok(report) => info!(
            "Wrote '{}': {} header bytes, {} character records, {} diagnostics",
            path.display(),
            report.header_length,
            report.records.len(),
            report.diagnostics.len()
        ),
        Err(_) if is_removable(path, before.as_ref()) => {
            if let Err(e) = fs::remove_file(path) {
                warn!("Failed to remove incomplete '{}': {}", path.display(), e);
            }
        }
        Err(_) => warn!("Leaving '{}' in place", path.display()),
    }
    result
}
